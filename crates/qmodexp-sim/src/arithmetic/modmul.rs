//! Controlled modular multiplication by a classical constant.

use serde::{Deserialize, Serialize};

use crate::classical::{gcd, mod_inverse, mul_mod};
use crate::error::{SimError, SimResult};
use crate::register::Register;
use crate::state::StateVector;

/// `|1⟩|y⟩ → |1⟩|multiplier · y mod modulus⟩`, identity when the control is 0.
///
/// This is a simulation shortcut: the amplitudes are permuted directly by
/// index instead of running a reversible multiplier circuit. Target values
/// `y ≥ modulus` are left where they are.
///
/// The map is a bijection on `[0, modulus)`, and therefore unitary, only when
/// `gcd(multiplier, modulus) = 1`. [`ControlledModMul::new`] does not check
/// this; with a non-coprime multiplier several targets collide and
/// probability is lost. Use [`ControlledModMul::checked`] to reject that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlledModMul {
    control: usize,
    target: Register,
    multiplier: u64,
    modulus: u64,
}

impl ControlledModMul {
    /// Create the gate without checking coprimality.
    pub fn new(
        control: usize,
        target_start: usize,
        target_count: usize,
        multiplier: u64,
        modulus: u64,
    ) -> SimResult<Self> {
        let gate = Self {
            control,
            target: Register::new(target_start, target_count),
            multiplier,
            modulus,
        };
        gate.check_parameters()?;
        Ok(gate)
    }

    /// Create the gate, rejecting a multiplier that shares a factor with the
    /// modulus.
    pub fn checked(
        control: usize,
        target_start: usize,
        target_count: usize,
        multiplier: u64,
        modulus: u64,
    ) -> SimResult<Self> {
        let gate = Self::new(control, target_start, target_count, multiplier, modulus)?;
        let g = gcd(multiplier, modulus);
        if g != 1 {
            return Err(SimError::NonUnitaryPrecondition {
                multiplier,
                modulus,
                gcd: g,
            });
        }
        Ok(gate)
    }

    /// The control qubit.
    pub fn control(&self) -> usize {
        self.control
    }

    /// The target register.
    pub fn target(&self) -> Register {
        self.target
    }

    /// The classical multiplier.
    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    /// The modulus.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Check whether the permutation is a bijection.
    pub fn is_unitary(&self) -> bool {
        gcd(self.multiplier, self.modulus) == 1
    }

    /// Image of a target value under an active control.
    pub fn map_value(&self, y: u64) -> u64 {
        if y < self.modulus {
            mul_mod(self.multiplier, y, self.modulus)
        } else {
            y
        }
    }

    /// The gate multiplying by `multiplier⁻¹ mod modulus`.
    pub fn inverse(&self) -> SimResult<Self> {
        let inv = mod_inverse(self.multiplier, self.modulus).ok_or(
            SimError::NonUnitaryPrecondition {
                multiplier: self.multiplier,
                modulus: self.modulus,
                gcd: gcd(self.multiplier, self.modulus),
            },
        )?;
        Ok(Self {
            // modulo 1 every multiplier is the identity; keep it non-zero
            multiplier: inv.max(1),
            ..*self
        })
    }

    /// All qubit positions touched.
    pub fn qubits(&self) -> Vec<usize> {
        std::iter::once(self.control)
            .chain(self.target.qubits())
            .collect()
    }

    fn check_parameters(&self) -> SimResult<()> {
        let (multiplier, modulus) = (self.multiplier, self.modulus);
        if multiplier == 0 || modulus == 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "multiplier ({multiplier}) and modulus ({modulus}) must be positive"
            )));
        }
        let target_count = self.target.len();
        if target_count == 0 {
            return Err(SimError::InvalidConfiguration(
                "target register must hold at least one qubit".into(),
            ));
        }
        if target_count < u64::BITS as usize && modulus > 1u64 << target_count {
            return Err(SimError::InvalidConfiguration(format!(
                "modulus {modulus} does not fit a {target_count}-qubit target register"
            )));
        }
        if self.target.contains(self.control) {
            return Err(SimError::invalid_gate(
                "cmodmul",
                format!(
                    "control qubit {} lies inside target register {}",
                    self.control, self.target
                ),
            ));
        }
        Ok(())
    }

    /// Check the parameters, then the control and target against
    /// `num_qubits`.
    ///
    /// A deserialized gate never went through [`ControlledModMul::new`], so
    /// the parameter checks run here again.
    pub fn validate(&self, num_qubits: usize) -> SimResult<()> {
        self.check_parameters()?;
        if self.control >= num_qubits {
            return Err(SimError::OutOfRangeQubit {
                qubit: self.control,
                num_qubits,
            });
        }
        self.target.check_fits(num_qubits)
    }

    pub(crate) fn apply_permutation(&self, state: &mut StateVector) {
        state.permute_controlled(self.control, self.target, |y| {
            self.map_value(y as u64) as usize
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            ControlledModMul::new(0, 1, 4, 0, 15),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            ControlledModMul::new(0, 1, 4, 7, 0),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            ControlledModMul::new(0, 1, 0, 7, 15),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            ControlledModMul::new(0, 1, 3, 7, 15),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            ControlledModMul::new(2, 1, 4, 7, 15),
            Err(SimError::InvalidGateConfiguration { .. })
        ));
    }

    #[test]
    fn test_unchecked_accepts_non_coprime() {
        let gate = ControlledModMul::new(0, 1, 4, 6, 15).unwrap();
        assert!(!gate.is_unitary());
        assert_eq!(
            ControlledModMul::checked(0, 1, 4, 6, 15),
            Err(SimError::NonUnitaryPrecondition {
                multiplier: 6,
                modulus: 15,
                gcd: 3
            })
        );
    }

    #[test]
    fn test_map_is_bijection_for_coprime() {
        let gate = ControlledModMul::checked(0, 1, 4, 7, 15).unwrap();
        let images: HashSet<u64> = (0..16).map(|y| gate.map_value(y)).collect();
        assert_eq!(images.len(), 16);
        assert_eq!(gate.map_value(15), 15);
    }

    #[test]
    fn test_inverse() {
        let gate = ControlledModMul::checked(0, 1, 4, 7, 15).unwrap();
        let inv = gate.inverse().unwrap();
        assert_eq!(inv.multiplier(), 13);
        for y in 0..15 {
            assert_eq!(inv.map_value(gate.map_value(y)), y);
        }
        assert!(ControlledModMul::new(0, 1, 4, 6, 15).unwrap().inverse().is_err());
    }
}

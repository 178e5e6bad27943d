//! Gate set and in-place application.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::arithmetic::{Adder, Comparator, ConditionalSubtractor, ControlledModMul};
use crate::error::{SimError, SimResult};
use crate::state::StateVector;

/// A unitary transform applied to a [`StateVector`] without materializing a
/// matrix. Acts as identity on every qubit it does not declare.
///
/// The set is closed: six primitives plus four composite arithmetic circuits.
/// Gates hold configuration only and may be applied to any state with enough
/// qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    // Single-qubit gates
    /// Hadamard gate.
    Hadamard {
        /// Target qubit.
        qubit: usize,
    },
    /// Pauli-X (NOT) gate.
    X {
        /// Target qubit.
        qubit: usize,
    },
    /// Phase shift: |1⟩ → e^{iθ}|1⟩.
    Phase {
        /// Target qubit.
        qubit: usize,
        /// Angle in radians.
        theta: f64,
    },

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    Cnot {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
    },
    /// SWAP gate.
    Swap {
        /// First qubit.
        q1: usize,
        /// Second qubit.
        q2: usize,
    },

    // Three-qubit gates
    /// Toffoli gate (CCX).
    Toffoli {
        /// First control qubit.
        control1: usize,
        /// Second control qubit.
        control2: usize,
        /// Target qubit.
        target: usize,
    },

    // Composite arithmetic
    /// Ripple-carry adder.
    Adder(Adder),
    /// Equality comparator.
    Comparator(Comparator),
    /// Controlled subtractor.
    ConditionalSubtractor(ConditionalSubtractor),
    /// Controlled modular multiplier.
    ControlledModMul(ControlledModMul),
}

impl Gate {
    /// Hadamard on `qubit`.
    pub fn hadamard(qubit: usize) -> Self {
        Gate::Hadamard { qubit }
    }

    /// Pauli-X on `qubit`.
    pub fn x(qubit: usize) -> Self {
        Gate::X { qubit }
    }

    /// Phase shift by `theta` on `qubit`.
    pub fn phase(qubit: usize, theta: f64) -> Self {
        Gate::Phase { qubit, theta }
    }

    /// CNOT; fails if `control == target`.
    pub fn cnot(control: usize, target: usize) -> SimResult<Self> {
        let gate = Gate::Cnot { control, target };
        gate.check_distinct()?;
        Ok(gate)
    }

    /// SWAP; fails if `q1 == q2`.
    pub fn swap(q1: usize, q2: usize) -> SimResult<Self> {
        let gate = Gate::Swap { q1, q2 };
        gate.check_distinct()?;
        Ok(gate)
    }

    /// Toffoli; fails if any two of the three qubits coincide.
    pub fn toffoli(control1: usize, control2: usize, target: usize) -> SimResult<Self> {
        let gate = Gate::Toffoli {
            control1,
            control2,
            target,
        };
        gate.check_distinct()?;
        Ok(gate)
    }

    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::Hadamard { .. } => "h",
            Gate::X { .. } => "x",
            Gate::Phase { .. } => "p",
            Gate::Cnot { .. } => "cx",
            Gate::Swap { .. } => "swap",
            Gate::Toffoli { .. } => "ccx",
            Gate::Adder(_) => "adder",
            Gate::Comparator(_) => "comparator",
            Gate::ConditionalSubtractor(_) => "csub",
            Gate::ControlledModMul(_) => "cmodmul",
        }
    }

    /// Check whether this is one of the six primitive gates.
    pub fn is_primitive(&self) -> bool {
        !matches!(
            self,
            Gate::Adder(_)
                | Gate::Comparator(_)
                | Gate::ConditionalSubtractor(_)
                | Gate::ControlledModMul(_)
        )
    }

    /// Qubit positions this gate reads or writes, in declaration order.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Gate::Hadamard { qubit } | Gate::X { qubit } | Gate::Phase { qubit, .. } => {
                vec![*qubit]
            }
            Gate::Cnot { control, target } => vec![*control, *target],
            Gate::Swap { q1, q2 } => vec![*q1, *q2],
            Gate::Toffoli {
                control1,
                control2,
                target,
            } => vec![*control1, *control2, *target],
            Gate::Adder(g) => g.qubits(),
            Gate::Comparator(g) => g.qubits(),
            Gate::ConditionalSubtractor(g) => g.qubits(),
            Gate::ControlledModMul(g) => g.qubits(),
        }
    }

    /// Smallest state width this gate can be applied to.
    pub fn required_qubits(&self) -> usize {
        self.qubits().into_iter().max().map_or(0, |q| q + 1)
    }

    /// Single-gate inverse, if one exists.
    ///
    /// The decomposed composites (adder, comparator, subtractor) have no
    /// single-gate inverse; reverse their circuit instead. The modular
    /// multiplier's inverse needs the multiplier to be invertible.
    pub fn inverse(&self) -> Option<Gate> {
        match self {
            Gate::Hadamard { .. }
            | Gate::X { .. }
            | Gate::Cnot { .. }
            | Gate::Swap { .. }
            | Gate::Toffoli { .. } => Some(self.clone()),
            Gate::Phase { qubit, theta } => Some(Gate::phase(*qubit, -theta)),
            Gate::ControlledModMul(g) => g.inverse().ok().map(Gate::ControlledModMul),
            Gate::Adder(_) | Gate::Comparator(_) | Gate::ConditionalSubtractor(_) => None,
        }
    }

    /// Check the gate against a state of `num_qubits` qubits.
    pub fn validate(&self, num_qubits: usize) -> SimResult<()> {
        match self {
            Gate::Adder(g) => g.validate(num_qubits),
            Gate::Comparator(g) => g.validate(num_qubits),
            Gate::ConditionalSubtractor(g) => g.validate(num_qubits),
            Gate::ControlledModMul(g) => g.validate(num_qubits),
            _ => {
                self.check_distinct()?;
                for qubit in self.qubits() {
                    if qubit >= num_qubits {
                        return Err(SimError::OutOfRangeQubit { qubit, num_qubits });
                    }
                }
                Ok(())
            }
        }
    }

    /// Apply this gate to `state` in place.
    ///
    /// All validation happens before the first amplitude is written, so an
    /// error leaves `state` unchanged.
    pub fn apply(&self, state: &mut StateVector) -> SimResult<()> {
        self.validate(state.num_qubits())?;
        trace!(gate = self.name(), qubits = ?self.qubits(), "apply");

        match self {
            Gate::Hadamard { qubit } => state.apply_h(*qubit),
            Gate::X { qubit } => state.apply_x(*qubit),
            Gate::Phase { qubit, theta } => state.apply_phase(*qubit, *theta),
            Gate::Cnot { control, target } => state.apply_cx(*control, *target),
            Gate::Swap { q1, q2 } => state.apply_swap(*q1, *q2),
            Gate::Toffoli {
                control1,
                control2,
                target,
            } => state.apply_ccx(*control1, *control2, *target),
            Gate::Adder(g) => g.circuit()?.apply(state)?,
            Gate::Comparator(g) => g.circuit()?.apply(state)?,
            Gate::ConditionalSubtractor(g) => g.circuit()?.apply(state)?,
            Gate::ControlledModMul(g) => g.apply_permutation(state),
        }
        Ok(())
    }

    fn check_distinct(&self) -> SimResult<()> {
        match *self {
            Gate::Cnot { control, target } if control == target => Err(SimError::invalid_gate(
                "cx",
                format!("control and target are both qubit {control}"),
            )),
            Gate::Swap { q1, q2 } if q1 == q2 => Err(SimError::invalid_gate(
                "swap",
                format!("both operands are qubit {q1}"),
            )),
            Gate::Toffoli {
                control1,
                control2,
                target,
            } => {
                if control1 == control2 {
                    Err(SimError::invalid_gate(
                        "ccx",
                        format!("both controls are qubit {control1}"),
                    ))
                } else if control1 == target || control2 == target {
                    Err(SimError::invalid_gate(
                        "ccx",
                        format!("target qubit {target} is also a control"),
                    ))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}

impl From<Adder> for Gate {
    fn from(gate: Adder) -> Self {
        Gate::Adder(gate)
    }
}

impl From<Comparator> for Gate {
    fn from(gate: Comparator) -> Self {
        Gate::Comparator(gate)
    }
}

impl From<ConditionalSubtractor> for Gate {
    fn from(gate: ConditionalSubtractor) -> Self {
        Gate::ConditionalSubtractor(gate)
    }
}

impl From<ControlledModMul> for Gate {
    fn from(gate: ControlledModMul) -> Self {
        Gate::ControlledModMul(gate)
    }
}

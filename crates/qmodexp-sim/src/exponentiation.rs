//! Modular exponentiation in superposition.
//!
//! Realizes `Σ_x |x⟩|1⟩ → Σ_x |x⟩|base^x mod N⟩` with square-and-multiply:
//! exponent qubit `i` controls a multiplication by `base^(2^i) mod N`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::arithmetic::ControlledModMul;
use crate::classical::{gcd, mod_pow, register_width, squared_powers};
use crate::error::{SimError, SimResult};
use crate::gate::Gate;
use crate::register::Register;
use crate::state::StateVector;

/// Relative deviation from `1/2^n` tolerated per branch during verification.
pub const BRANCH_PROBABILITY_TOLERANCE: f64 = 0.01;

/// Input parameters of a modular-exponentiation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModExpConfig {
    /// The base `a` in `a^x mod N`.
    pub base: u64,
    /// The modulus `N`.
    pub modulus: u64,
    /// Width of the exponent register.
    #[serde(alias = "qubits")]
    pub exponent_qubits: usize,
}

impl ModExpConfig {
    /// Largest supported exponent register.
    pub const MAX_EXPONENT_QUBITS: usize = 10;
    /// Exclusive upper bound on the modulus (keeps the target at ≤ 10 qubits).
    pub const MAX_MODULUS: u64 = 1024;

    /// Create a configuration.
    pub fn new(base: u64, modulus: u64, exponent_qubits: usize) -> Self {
        Self {
            base,
            modulus,
            exponent_qubits,
        }
    }

    /// Check ranges: every value positive, `2 ≤ modulus < 1024`,
    /// `exponent_qubits ≤ 10`.
    pub fn validate(&self) -> SimResult<()> {
        if self.base == 0 || self.modulus == 0 || self.exponent_qubits == 0 {
            return Err(SimError::InvalidConfiguration(
                "base, modulus and qubit count must all be positive".into(),
            ));
        }
        // modulo 1 the target |1⟩ lies outside [0, modulus) and never reaches 0
        if self.modulus < 2 {
            return Err(SimError::InvalidConfiguration(
                "modulus must be at least 2".into(),
            ));
        }
        if self.exponent_qubits > Self::MAX_EXPONENT_QUBITS {
            return Err(SimError::InvalidConfiguration(format!(
                "exponent register of {} qubits exceeds the limit of {}",
                self.exponent_qubits,
                Self::MAX_EXPONENT_QUBITS
            )));
        }
        if self.modulus >= Self::MAX_MODULUS {
            return Err(SimError::InvalidConfiguration(format!(
                "modulus {} must be below {}",
                self.modulus,
                Self::MAX_MODULUS
            )));
        }
        Ok(())
    }
}

/// Parses the whitespace-separated `base modulus qubits` form.
impl FromStr for ModExpConfig {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let [base, modulus, qubits] = fields.as_slice() else {
            return Err(SimError::InvalidConfiguration(format!(
                "expected `base modulus qubits`, found {} value(s)",
                fields.len()
            )));
        };
        Ok(Self {
            base: parse_field("base", base)?,
            modulus: parse_field("modulus", modulus)?,
            exponent_qubits: parse_field("qubits", qubits)? as usize,
        })
    }
}

fn parse_field(name: &str, value: &str) -> SimResult<u64> {
    value.parse().map_err(|_| {
        SimError::InvalidConfiguration(format!("{name} is not a non-negative integer: {value}"))
    })
}

/// Qubit layout: exponent register first, target register appended after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModExpLayout {
    /// Exponent register `[0, n)`.
    pub exponent: Register,
    /// Target register `[n, n + m)`.
    pub target: Register,
}

impl ModExpLayout {
    /// Layout for `exponent_qubits` and a target wide enough for `[0, modulus)`.
    pub fn new(exponent_qubits: usize, modulus: u64) -> Self {
        Self {
            exponent: Register::new(0, exponent_qubits),
            target: Register::new(exponent_qubits, register_width(modulus)),
        }
    }

    /// Total qubit count.
    pub fn total_qubits(&self) -> usize {
        self.target.end()
    }

    /// Basis index of `|exponent⟩|target⟩`.
    pub fn index_of(&self, exponent: usize, target: usize) -> usize {
        self.target.replace(self.exponent.replace(0, exponent), target)
    }
}

/// The exponentiation driver.
///
/// Construction validates the configuration and the coprimality of base and
/// modulus; nothing is allocated or built when either check fails.
#[derive(Debug, Clone)]
pub struct ModularExponentiation {
    config: ModExpConfig,
    layout: ModExpLayout,
}

impl ModularExponentiation {
    /// Validate `config` and prepare the layout.
    ///
    /// Fails with [`SimError::NonUnitaryPrecondition`] when
    /// `gcd(base, modulus) ≠ 1`; the reported gcd is a non-trivial factor of
    /// the modulus.
    pub fn new(config: ModExpConfig) -> SimResult<Self> {
        config.validate()?;
        let g = gcd(config.base, config.modulus);
        if g != 1 {
            return Err(SimError::NonUnitaryPrecondition {
                multiplier: config.base,
                modulus: config.modulus,
                gcd: g,
            });
        }
        let layout = ModExpLayout::new(config.exponent_qubits, config.modulus);
        debug!(
            exponent_qubits = config.exponent_qubits,
            target_qubits = layout.target.len(),
            "modular exponentiation layout"
        );
        Ok(Self { config, layout })
    }

    /// The validated configuration.
    pub fn config(&self) -> &ModExpConfig {
        &self.config
    }

    /// The qubit layout.
    pub fn layout(&self) -> &ModExpLayout {
        &self.layout
    }

    /// `base^(2^i) mod modulus` for every exponent qubit `i`.
    pub fn powers(&self) -> Vec<u64> {
        squared_powers(
            self.config.base,
            self.config.modulus,
            self.config.exponent_qubits,
        )
    }

    /// The controlled multiplications, one per exponent qubit.
    pub fn multipliers(&self) -> SimResult<Vec<ControlledModMul>> {
        let target = self.layout.target;
        self.powers()
            .into_iter()
            .enumerate()
            .map(|(i, power)| {
                ControlledModMul::checked(
                    i,
                    target.start(),
                    target.len(),
                    power,
                    self.config.modulus,
                )
            })
            .collect()
    }

    /// Run every stage and return the final state.
    pub fn run(&self) -> SimResult<ModExpRun> {
        self.run_with(|_, _| {})
    }

    /// Like [`run`](Self::run), calling `on_multiply(i, gate)` after the
    /// controlled multiplication of exponent qubit `i` has been applied.
    pub fn run_with(
        &self,
        mut on_multiply: impl FnMut(usize, &ControlledModMul),
    ) -> SimResult<ModExpRun> {
        let layout = self.layout;
        let multipliers = self.multipliers()?;

        // |0…0⟩|1⟩
        let mut state = StateVector::basis(layout.total_qubits(), layout.index_of(0, 1))?;
        debug!(
            qubits = state.num_qubits(),
            bytes = state.memory_usage(),
            "allocated statevector"
        );

        for qubit in layout.exponent.qubits() {
            Gate::hadamard(qubit).apply(&mut state)?;
        }
        debug!(
            branches = 1usize << layout.exponent.len(),
            "exponent register in uniform superposition"
        );

        let powers = self.powers();
        for (i, power) in powers.iter().enumerate() {
            debug!(
                "{}^(2^{i}) mod {} = {power}",
                self.config.base, self.config.modulus
            );
        }

        for (i, gate) in multipliers.iter().enumerate() {
            Gate::from(*gate).apply(&mut state)?;
            on_multiply(i, gate);
        }
        info!(
            base = self.config.base,
            modulus = self.config.modulus,
            "modular exponentiation complete"
        );

        Ok(ModExpRun {
            config: self.config,
            layout,
            powers,
            state,
        })
    }
}

/// Output of a finished run.
#[derive(Debug, Clone)]
pub struct ModExpRun {
    /// Configuration the run was built from.
    pub config: ModExpConfig,
    /// Qubit layout.
    pub layout: ModExpLayout,
    /// `base^(2^i) mod modulus` per exponent qubit.
    pub powers: Vec<u64>,
    /// The final state.
    pub state: StateVector,
}

impl ModExpRun {
    /// Most probable target value on the branch with exponent `x`, and its
    /// probability. Ties resolve to the smallest target value.
    ///
    /// Returns `None` when `x` does not fit the exponent register.
    pub fn dominant_target(&self, x: usize) -> Option<(usize, f64)> {
        (x <= self.layout.exponent.max_value()).then(|| self.branch_peak(x))
    }

    fn branch_peak(&self, x: usize) -> (usize, f64) {
        let amplitudes = self.state.amplitudes();
        let mut best = (0usize, 0.0f64);
        for y in 0..=self.layout.target.max_value() {
            let p = amplitudes[self.layout.index_of(x, y)].norm_sqr();
            if p > best.1 {
                best = (y, p);
            }
        }
        best
    }

    /// Compare every exponent branch against the classical result.
    pub fn verify(&self) -> VerificationReport {
        let branches = 1usize << self.layout.exponent.len();
        let expected_probability = 1.0 / branches as f64;

        let results: Vec<BranchResult> = (0..branches)
            .map(|x| {
                let expected = mod_pow(self.config.base, x as u64, self.config.modulus);
                let (observed, probability) = self.branch_peak(x);
                let relative_error =
                    (probability - expected_probability).abs() / expected_probability;
                BranchResult {
                    exponent: x as u64,
                    expected,
                    observed: observed as u64,
                    probability,
                    passed: observed as u64 == expected
                        && relative_error < BRANCH_PROBABILITY_TOLERANCE,
                }
            })
            .collect();

        let passed = results.iter().filter(|r| r.passed).count();
        debug!(passed, total = results.len(), "verification finished");

        VerificationReport {
            config: self.config,
            expected_probability,
            branches: results,
        }
    }
}

/// Outcome for one exponent value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchResult {
    /// The exponent `x`.
    pub exponent: u64,
    /// `base^x mod modulus`, computed classically.
    pub expected: u64,
    /// Most probable target value on this branch.
    pub observed: u64,
    /// Probability of `|x⟩|observed⟩`.
    pub probability: f64,
    /// Whether value and probability both match.
    pub passed: bool,
}

/// Per-branch comparison of a run against classical modular exponentiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Configuration that was verified.
    pub config: ModExpConfig,
    /// Ideal probability of each branch, `1/2^n`.
    pub expected_probability: f64,
    /// One entry per exponent value.
    pub branches: Vec<BranchResult>,
}

impl VerificationReport {
    /// Number of passing branches.
    pub fn passed(&self) -> usize {
        self.branches.iter().filter(|b| b.passed).count()
    }

    /// Number of branches checked.
    pub fn total(&self) -> usize {
        self.branches.len()
    }

    /// Check whether every branch passed.
    pub fn all_passed(&self) -> bool {
        self.branches.iter().all(|b| b.passed)
    }

    /// Branches that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BranchResult> {
        self.branches.iter().filter(|b| !b.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_limits() {
        assert!(ModExpConfig::new(7, 15, 4).validate().is_ok());
        assert!(ModExpConfig::new(0, 15, 4).validate().is_err());
        assert!(ModExpConfig::new(7, 0, 4).validate().is_err());
        assert!(ModExpConfig::new(7, 1, 4).validate().is_err());
        assert!(ModExpConfig::new(7, 15, 0).validate().is_err());
        assert!(ModExpConfig::new(7, 15, 11).validate().is_err());
        assert!(ModExpConfig::new(7, 1024, 4).validate().is_err());
        assert!(ModExpConfig::new(7, 1023, 10).validate().is_ok());
    }

    #[test]
    fn test_layout() {
        let layout = ModExpLayout::new(4, 15);
        assert_eq!(layout.exponent, Register::new(0, 4));
        assert_eq!(layout.target, Register::new(4, 4));
        assert_eq!(layout.total_qubits(), 8);
        assert_eq!(layout.index_of(3, 1), 0b0001_0011);
    }

    #[test]
    fn test_minimum_target_width() {
        assert_eq!(ModExpLayout::new(2, 1).target.len(), 1);
        assert_eq!(ModExpLayout::new(2, 3).target.len(), 2);
        assert_eq!(ModExpLayout::new(2, 2).target.len(), 1);
    }

    #[test]
    fn test_non_coprime_rejected() {
        let err = ModularExponentiation::new(ModExpConfig::new(6, 15, 4)).unwrap_err();
        assert_eq!(
            err,
            SimError::NonUnitaryPrecondition {
                multiplier: 6,
                modulus: 15,
                gcd: 3
            }
        );
    }

    #[test]
    fn test_powers() {
        let driver = ModularExponentiation::new(ModExpConfig::new(7, 15, 4)).unwrap();
        assert_eq!(driver.powers(), vec![7, 4, 1, 1]);
        assert_eq!(driver.multipliers().unwrap().len(), 4);
    }

    #[test]
    fn test_config_from_text() {
        assert_eq!("7 15 4\n".parse(), Ok(ModExpConfig::new(7, 15, 4)));
        assert_eq!("  7\t15\n4 ".parse(), Ok(ModExpConfig::new(7, 15, 4)));
        assert!("7 15".parse::<ModExpConfig>().is_err());
        assert!("7 15 4 2".parse::<ModExpConfig>().is_err());
        assert!("7 -15 4".parse::<ModExpConfig>().is_err());
        assert!("seven 15 4".parse::<ModExpConfig>().is_err());
    }

    #[test]
    fn test_config_deserialize_alias() {
        let config: ModExpConfig =
            serde_json::from_str(r#"{"base": 7, "modulus": 15, "qubits": 4}"#).unwrap();
        assert_eq!(config, ModExpConfig::new(7, 15, 4));
    }
}

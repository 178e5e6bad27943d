//! Error types for the simulation engine.

use thiserror::Error;

/// Errors raised while building or applying gates to a statevector.
///
/// Every variant is produced before the offending gate touches any amplitude.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A numeric parameter is zero, negative or outside its allowed range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A gate was given degenerate or overlapping qubit roles.
    #[error("Invalid configuration for gate '{gate}': {reason}")]
    InvalidGateConfiguration {
        /// Name of the gate.
        gate: &'static str,
        /// What is wrong with the qubit assignment.
        reason: String,
    },

    /// A qubit (or the end of a register) lies outside the statevector.
    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit state")]
    OutOfRangeQubit {
        /// The offending qubit position.
        qubit: usize,
        /// Number of qubits in the state.
        num_qubits: usize,
    },

    /// A basis-state index lies outside `[0, 2^n)`.
    #[error("Basis index {index} is out of range for a state of size {size}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of amplitudes in the state.
        size: usize,
    },

    /// Multiplication by `multiplier` is not a bijection modulo `modulus`.
    #[error(
        "gcd({multiplier}, {modulus}) = {gcd}: modular multiplication would not be unitary"
    )]
    NonUnitaryPrecondition {
        /// The multiplier (or base).
        multiplier: u64,
        /// The modulus.
        modulus: u64,
        /// Their greatest common divisor, a non-trivial factor of `modulus`.
        gcd: u64,
    },
}

impl SimError {
    pub(crate) fn invalid_gate(gate: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidGateConfiguration {
            gate,
            reason: reason.into(),
        }
    }
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

//! Ordered gate sequences.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::gate::Gate;
use crate::state::StateVector;

/// An ordered sequence of gates.
///
/// Applying a circuit applies its gates left to right, which is the product of
/// their unitaries taken right to left.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Gates in application order.
    gates: Vec<Gate>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gates: vec![],
        }
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gates in application order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Check if the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Smallest state width every gate fits into.
    pub fn required_qubits(&self) -> usize {
        self.gates
            .iter()
            .map(Gate::required_qubits)
            .max()
            .unwrap_or(0)
    }

    /// Append a gate.
    pub fn push(&mut self, gate: impl Into<Gate>) -> &mut Self {
        self.gates.push(gate.into());
        self
    }

    /// Append all gates of another circuit.
    pub fn extend(&mut self, other: &Circuit) -> &mut Self {
        self.gates.extend(other.gates.iter().cloned());
        self
    }

    // =========================================================================
    // Primitive builders
    // =========================================================================

    /// Append a Hadamard gate.
    pub fn h(&mut self, qubit: usize) -> &mut Self {
        self.push(Gate::hadamard(qubit))
    }

    /// Append a Pauli-X gate.
    pub fn x(&mut self, qubit: usize) -> &mut Self {
        self.push(Gate::x(qubit))
    }

    /// Append a phase-shift gate.
    pub fn phase(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.push(Gate::phase(qubit, theta))
    }

    /// Append a CNOT gate.
    pub fn cx(&mut self, control: usize, target: usize) -> SimResult<&mut Self> {
        Ok(self.push(Gate::cnot(control, target)?))
    }

    /// Append a SWAP gate.
    pub fn swap(&mut self, q1: usize, q2: usize) -> SimResult<&mut Self> {
        Ok(self.push(Gate::swap(q1, q2)?))
    }

    /// Append a Toffoli gate.
    pub fn ccx(&mut self, control1: usize, control2: usize, target: usize) -> SimResult<&mut Self> {
        Ok(self.push(Gate::toffoli(control1, control2, target)?))
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Check every gate against a state of `num_qubits` qubits.
    pub fn validate(&self, num_qubits: usize) -> SimResult<()> {
        self.gates.iter().try_for_each(|g| g.validate(num_qubits))
    }

    /// Apply all gates in order.
    ///
    /// The whole circuit is validated first, so a bad gate anywhere in the
    /// sequence is reported before the state changes.
    pub fn apply(&self, state: &mut StateVector) -> SimResult<()> {
        self.validate(state.num_qubits())?;
        debug!(
            circuit = %self.name,
            gates = self.gates.len(),
            qubits = state.num_qubits(),
            "applying circuit"
        );
        for gate in &self.gates {
            gate.apply(state)?;
        }
        Ok(())
    }

    /// The inverse circuit: gates in reverse order, each inverted.
    ///
    /// Decomposed composites are expanded into their reversed primitive
    /// sequences. This is how callers uncompute carry and borrow ancilla left
    /// dirty by the arithmetic circuits.
    pub fn reversed(&self) -> SimResult<Circuit> {
        let mut inverse = Circuit::new(format!("{}_inv", self.name));
        for gate in self.gates.iter().rev() {
            if let Some(inv) = gate.inverse() {
                inverse.push(inv);
                continue;
            }
            let decomposed = match gate {
                Gate::Adder(g) => g.circuit()?,
                Gate::Comparator(g) => g.circuit()?,
                Gate::ConditionalSubtractor(g) => g.circuit()?,
                other => {
                    return Err(SimError::invalid_gate(
                        other.name(),
                        "gate has no inverse",
                    ));
                }
            };
            inverse.extend(&decomposed.reversed()?);
        }
        Ok(inverse)
    }
}

//! Equality comparator.

use serde::{Deserialize, Serialize};

use super::check_width;
use crate::circuit::Circuit;
use crate::error::SimResult;
use crate::register::Register;

/// Equality detector over two `bits`-wide registers.
///
/// The result register is `bits + 1` wide. `result_0` is set to 1, then for
/// each bit `b_i` is overwritten with `a_i == b_i` and ANDed into the chain
/// `result_{i+1} = result_i ∧ (a_i == b_i)`. The result register reads all
/// ones exactly when the operands were equal.
///
/// This is not a three-way comparison, and `b` is consumed as scratch: after
/// application it holds the bitwise equality pattern, not its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparator {
    a: Register,
    b: Register,
    result: Register,
}

impl Comparator {
    /// Create a comparator over `bits`-wide registers.
    pub fn new(
        a_start: usize,
        b_start: usize,
        result_start: usize,
        bits: usize,
    ) -> SimResult<Self> {
        check_width("comparator", bits)?;
        Ok(Self {
            a: Register::new(a_start, bits),
            b: Register::new(b_start, bits),
            result: Register::new(result_start, bits + 1),
        })
    }

    /// Operand width.
    pub fn bits(&self) -> usize {
        self.a.len()
    }

    /// First operand (unchanged).
    pub fn a(&self) -> Register {
        self.a
    }

    /// Second operand (overwritten with the equality pattern).
    pub fn b(&self) -> Register {
        self.b
    }

    /// The result chain, `bits + 1` qubits.
    pub fn result(&self) -> Register {
        self.result
    }

    /// Last qubit of the chain; 1 iff all bit pairs matched.
    pub fn equal_flag(&self) -> usize {
        self.result.start() + self.bits()
    }

    /// Interpret a value read from the result register.
    pub fn is_equal(&self, result_value: usize) -> bool {
        result_value == self.result.max_value()
    }

    /// All qubit positions touched.
    pub fn qubits(&self) -> Vec<usize> {
        self.a
            .qubits()
            .chain(self.b.qubits())
            .chain(self.result.qubits())
            .collect()
    }

    /// Check that every register fits into `num_qubits`.
    pub fn validate(&self, num_qubits: usize) -> SimResult<()> {
        self.a.check_fits(num_qubits)?;
        self.b.check_fits(num_qubits)?;
        self.result.check_fits(num_qubits)
    }

    /// Primitive decomposition, least significant bit first.
    pub fn circuit(&self) -> SimResult<Circuit> {
        let mut circuit = Circuit::new("comparator");
        circuit.x(self.result.start());
        for i in 0..self.bits() {
            let a_i = self.a.start() + i;
            let b_i = self.b.start() + i;
            let r_i = self.result.start() + i;

            circuit.cx(a_i, b_i)?.x(b_i).ccx(b_i, r_i, r_i + 1)?;
        }
        Ok(circuit)
    }
}

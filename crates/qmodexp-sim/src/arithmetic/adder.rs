//! Ripple-carry adder.

use serde::{Deserialize, Serialize};

use super::check_width;
use crate::circuit::Circuit;
use crate::error::SimResult;
use crate::register::Register;

/// `|a⟩|b⟩|0⟩ → |a⟩|(a + b) mod 2^bits⟩|carries⟩`.
///
/// Layout: `a` and `b` are `bits` wide; the carry register is `bits + 1`
/// wide with `carry_0` as carry-in and `carry_bits` as carry-out.
///
/// Bit `i` folds the majority of `(a_i, b_i, carry_i)` into `carry_{i+1}` with
/// three Toffolis (the pairwise ANDs XOR to the majority), then writes the sum
/// bit into `b_i` with two CNOTs. The intermediate carries are left set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adder {
    a: Register,
    b: Register,
    carry: Register,
}

impl Adder {
    /// Create an adder over `bits`-wide registers.
    pub fn new(a_start: usize, b_start: usize, carry_start: usize, bits: usize) -> SimResult<Self> {
        check_width("adder", bits)?;
        Ok(Self {
            a: Register::new(a_start, bits),
            b: Register::new(b_start, bits),
            carry: Register::new(carry_start, bits + 1),
        })
    }

    /// Operand width.
    pub fn bits(&self) -> usize {
        self.a.len()
    }

    /// The addend register (unchanged).
    pub fn a(&self) -> Register {
        self.a
    }

    /// The accumulator register (receives the sum).
    pub fn b(&self) -> Register {
        self.b
    }

    /// The carry chain, `bits + 1` qubits.
    pub fn carry(&self) -> Register {
        self.carry
    }

    /// Qubit holding the final carry.
    pub fn carry_out(&self) -> usize {
        self.carry.start() + self.bits()
    }

    /// All qubit positions touched.
    pub fn qubits(&self) -> Vec<usize> {
        self.a
            .qubits()
            .chain(self.b.qubits())
            .chain(self.carry.qubits())
            .collect()
    }

    /// Check that every register fits into `num_qubits`.
    pub fn validate(&self, num_qubits: usize) -> SimResult<()> {
        self.a.check_fits(num_qubits)?;
        self.b.check_fits(num_qubits)?;
        self.carry.check_fits(num_qubits)
    }

    /// Primitive decomposition, least significant bit first.
    pub fn circuit(&self) -> SimResult<Circuit> {
        let mut circuit = Circuit::new("adder");
        for i in 0..self.bits() {
            let a_i = self.a.start() + i;
            let b_i = self.b.start() + i;
            let c_in = self.carry.start() + i;
            let c_out = c_in + 1;

            circuit
                .ccx(a_i, b_i, c_out)?
                .ccx(a_i, c_in, c_out)?
                .ccx(b_i, c_in, c_out)?
                .cx(a_i, b_i)?
                .cx(c_in, b_i)?;
        }
        Ok(circuit)
    }
}

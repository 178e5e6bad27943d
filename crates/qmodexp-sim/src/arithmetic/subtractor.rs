//! Controlled ripple-borrow subtractor.

use serde::{Deserialize, Serialize};

use super::check_width;
use crate::circuit::Circuit;
use crate::error::SimResult;
use crate::register::Register;

/// `|c⟩|a⟩|b⟩ → |c⟩|a⟩|(b − c·a) mod 2^bits⟩`, leaving the borrow chain set.
///
/// The control block starting at `control_start` is `bits + 3` qubits:
///
/// | offset | role |
/// |---|---|
/// | 0 | control |
/// | 1 | scratch, holds `control ∧ a_i` while bit `i` is processed |
/// | 2 ..= bits + 2 | borrow chain, `borrow_0` in, `borrow_bits` out |
///
/// The borrow chain mirrors the adder's carry chain with `b_i` negated:
/// `borrow_{i+1} = MAJ(¬b_i, control ∧ a_i, borrow_i)`. With control 0 the
/// masked operand is 0, no borrow is ever raised and `b` is untouched. The
/// scratch qubit is restored after every bit; the borrows are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalSubtractor {
    a: Register,
    b: Register,
    control_start: usize,
}

impl ConditionalSubtractor {
    /// Create a subtractor over `bits`-wide registers.
    pub fn new(
        a_start: usize,
        b_start: usize,
        control_start: usize,
        bits: usize,
    ) -> SimResult<Self> {
        check_width("conditional subtractor", bits)?;
        Ok(Self {
            a: Register::new(a_start, bits),
            b: Register::new(b_start, bits),
            control_start,
        })
    }

    /// Operand width.
    pub fn bits(&self) -> usize {
        self.a.len()
    }

    /// The subtrahend register (unchanged).
    pub fn a(&self) -> Register {
        self.a
    }

    /// The minuend register (receives the difference).
    pub fn b(&self) -> Register {
        self.b
    }

    /// The control qubit.
    pub fn control(&self) -> usize {
        self.control_start
    }

    /// The scratch qubit.
    pub fn scratch(&self) -> usize {
        self.control_start + 1
    }

    /// The borrow chain, `bits + 1` qubits.
    pub fn borrow(&self) -> Register {
        Register::new(self.control_start + 2, self.bits() + 1)
    }

    /// Qubit holding the final borrow; 1 iff `a > b` under an active control.
    pub fn borrow_out(&self) -> usize {
        self.borrow().start() + self.bits()
    }

    fn control_block(&self) -> Register {
        Register::new(self.control_start, self.bits() + 3)
    }

    /// All qubit positions touched.
    pub fn qubits(&self) -> Vec<usize> {
        self.a
            .qubits()
            .chain(self.b.qubits())
            .chain(self.control_block().qubits())
            .collect()
    }

    /// Check that every register fits into `num_qubits`.
    pub fn validate(&self, num_qubits: usize) -> SimResult<()> {
        self.a.check_fits(num_qubits)?;
        self.b.check_fits(num_qubits)?;
        self.control_block().check_fits(num_qubits)
    }

    /// Primitive decomposition, least significant bit first.
    pub fn circuit(&self) -> SimResult<Circuit> {
        let control = self.control();
        let scratch = self.scratch();
        let borrow = self.borrow();

        let mut circuit = Circuit::new("conditional_subtractor");
        for i in 0..self.bits() {
            let a_i = self.a.start() + i;
            let b_i = self.b.start() + i;
            let w_in = borrow.start() + i;
            let w_out = w_in + 1;

            circuit.ccx(control, a_i, scratch)?;

            circuit.x(b_i);
            circuit
                .ccx(scratch, b_i, w_out)?
                .ccx(scratch, w_in, w_out)?
                .ccx(b_i, w_in, w_out)?;
            circuit.x(b_i);

            circuit.cx(scratch, b_i)?.cx(w_in, b_i)?;

            circuit.ccx(control, a_i, scratch)?;
        }
        Ok(circuit)
    }
}

//! Reversible arithmetic built on top of the primitive gates.
//!
//! The adder, comparator and conditional subtractor are decomposed into
//! Toffoli / CNOT / X sequences (see their `circuit()` methods). None of them
//! uncomputes its ancilla: carries, borrows and the comparator's consumed `b`
//! register stay dirty until the caller applies the reversed circuit.
//!
//! The controlled modular multiplier is not decomposed; it permutes amplitude
//! positions directly.

mod adder;
mod comparator;
mod modmul;
mod subtractor;

pub use adder::Adder;
pub use comparator::Comparator;
pub use modmul::ControlledModMul;
pub use subtractor::ConditionalSubtractor;

use crate::error::{SimError, SimResult};

fn check_width(gate: &str, bits: usize) -> SimResult<()> {
    if bits == 0 {
        return Err(SimError::InvalidConfiguration(format!(
            "{gate} width must be at least 1 bit"
        )));
    }
    Ok(())
}

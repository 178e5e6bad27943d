//! Contiguous qubit registers and bit-field helpers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SimError, SimResult};

/// Read the `count`-bit field starting at bit `start` of a basis index.
#[inline]
pub fn extract_bits(index: usize, start: usize, count: usize) -> usize {
    (index >> start) & field_mask(count)
}

/// Overwrite the `count`-bit field starting at bit `start` of a basis index.
///
/// Bits of `value` above `count` are discarded.
#[inline]
pub fn replace_bits(index: usize, start: usize, count: usize, value: usize) -> usize {
    let mask = field_mask(count) << start;
    (index & !mask) | ((value << start) & mask)
}

#[inline]
fn field_mask(count: usize) -> usize {
    if count >= usize::BITS as usize {
        usize::MAX
    } else {
        (1usize << count) - 1
    }
}

/// A non-owning view of qubits `[start, start + count)` read as an unsigned
/// integer, qubit `start` being the least significant bit.
///
/// Registers carry no reference to a statevector. Several registers may tile
/// the same state, and overlapping them is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    start: usize,
    count: usize,
}

impl Register {
    /// Create a register view.
    pub const fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }

    /// First (least significant) qubit position.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Number of qubits.
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Check if the register has no qubits.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// One past the last qubit position.
    pub const fn end(&self) -> usize {
        self.start + self.count
    }

    /// Qubit position of bit `i`.
    pub fn qubit(&self, i: usize) -> Option<usize> {
        (i < self.count).then_some(self.start + i)
    }

    /// Iterate over qubit positions, LSB first.
    pub fn qubits(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }

    /// Check whether a qubit position lies inside this register.
    pub fn contains(&self, qubit: usize) -> bool {
        qubit >= self.start && qubit < self.end()
    }

    /// Largest value the register can hold.
    pub fn max_value(&self) -> usize {
        field_mask(self.count)
    }

    /// Mask selecting this register's bits inside a basis index.
    pub fn mask(&self) -> usize {
        field_mask(self.count) << self.start
    }

    /// Read the register's value out of a basis index.
    #[inline]
    pub fn extract(&self, index: usize) -> usize {
        extract_bits(index, self.start, self.count)
    }

    /// Write `value` into the register's bits of a basis index.
    #[inline]
    pub fn replace(&self, index: usize, value: usize) -> usize {
        replace_bits(index, self.start, self.count, value)
    }

    /// Fail with [`SimError::OutOfRangeQubit`] unless the register fits in a
    /// state of `num_qubits` qubits.
    pub fn check_fits(&self, num_qubits: usize) -> SimResult<()> {
        if self.end() > num_qubits {
            return Err(SimError::OutOfRangeQubit {
                qubit: self.end() - 1,
                num_qubits,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.count {
            0 => write!(f, "q[{}..{})", self.start, self.start),
            _ => write!(f, "q[{}..={}]", self.start, self.end() - 1),
        }
    }
}

//! Dense statevector and the in-place gate kernels that act on it.

use num_complex::Complex64;
use std::fmt;
use std::mem::size_of;

use crate::error::{SimError, SimResult};
use crate::register::Register;

/// Largest qubit count a statevector may be allocated with (1 GiB of amplitudes).
pub const MAX_QUBITS: usize = 26;

/// Tolerance used by [`StateVector::is_normalized`].
pub const NORMALIZATION_TOLERANCE: f64 = 1e-10;

/// A pure quantum state over `n` qubits held as `2^n` complex amplitudes.
///
/// Bit `q` of a basis index is the value of qubit `q`. The buffer is allocated
/// once and never resized.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl StateVector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        Self::basis(num_qubits, 0)
    }

    /// Create a statevector holding the single basis state `|index⟩`.
    pub fn basis(num_qubits: usize, index: usize) -> SimResult<Self> {
        if num_qubits == 0 {
            return Err(SimError::InvalidConfiguration(
                "number of qubits must be positive".into(),
            ));
        }
        if num_qubits > MAX_QUBITS {
            return Err(SimError::InvalidConfiguration(format!(
                "{num_qubits} qubits exceeds the supported maximum of {MAX_QUBITS}"
            )));
        }
        let size = 1usize << num_qubits;
        if index >= size {
            return Err(SimError::IndexOutOfRange { index, size });
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of basis states (`2^n`).
    pub fn size(&self) -> usize {
        self.amplitudes.len()
    }

    /// All amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Amplitude of basis state `index`.
    pub fn amplitude(&self, index: usize) -> SimResult<Complex64> {
        self.check_index(index)?;
        Ok(self.amplitudes[index])
    }

    /// Overwrite the amplitude of basis state `index`.
    ///
    /// This bypasses unitarity; it exists for preparing test inputs.
    pub fn set_amplitude(&mut self, index: usize, value: Complex64) -> SimResult<()> {
        self.check_index(index)?;
        self.amplitudes[index] = value;
        Ok(())
    }

    /// Probability `|amplitude|²` of basis state `index`.
    pub fn probability(&self, index: usize) -> SimResult<f64> {
        self.check_index(index)?;
        Ok(self.amplitudes[index].norm_sqr())
    }

    /// Sum of all probabilities.
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Check that the total probability is 1 within [`NORMALIZATION_TOLERANCE`].
    pub fn is_normalized(&self) -> bool {
        (self.total_probability() - 1.0).abs() < NORMALIZATION_TOLERANCE
    }

    /// Bytes held by the amplitude buffer.
    pub fn memory_usage(&self) -> usize {
        self.amplitudes.len() * size_of::<Complex64>()
    }

    /// Basis states whose probability exceeds `threshold`, in index order.
    pub fn significant_states(
        &self,
        threshold: f64,
    ) -> impl Iterator<Item = (usize, Complex64, f64)> + '_ {
        self.amplitudes
            .iter()
            .enumerate()
            .map(|(i, amp)| (i, *amp, amp.norm_sqr()))
            .filter(move |(_, _, p)| *p > threshold)
    }

    /// Value held by `register` in the single most probable basis state.
    ///
    /// Ties resolve to the lowest index.
    pub fn most_likely_value(&self, register: Register) -> SimResult<usize> {
        register.check_fits(self.num_qubits)?;
        let mut best = (0usize, f64::NEG_INFINITY);
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let p = amp.norm_sqr();
            if p > best.1 {
                best = (i, p);
            }
        }
        Ok(register.extract(best.0))
    }

    /// Fail with [`SimError::OutOfRangeQubit`] unless `qubit < n`.
    pub fn check_qubit(&self, qubit: usize) -> SimResult<()> {
        if qubit >= self.num_qubits {
            return Err(SimError::OutOfRangeQubit {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> SimResult<()> {
        if index >= self.amplitudes.len() {
            return Err(SimError::IndexOutOfRange {
                index,
                size: self.amplitudes.len(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Gate kernels
    //
    // Callers validate qubit positions first. Pairs are visited once through
    // their member with the relevant bit clear, so no scratch buffer is needed.
    // =========================================================================

    pub(crate) fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    pub(crate) fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    pub(crate) fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    pub(crate) fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    pub(crate) fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    pub(crate) fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let c1_mask = 1 << c1;
        let c2_mask = 1 << c2;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & c1_mask != 0) && (i & c2_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    /// Move every amplitude whose `control` bit is set from `|.., y, ..⟩` to
    /// `|.., map(y), ..⟩`, `y` being the value of `register`.
    ///
    /// `map` must be a bijection on the register's values for the result to
    /// stay unitary. Reads come from a working copy so that chains of moves
    /// never observe already-written slots.
    pub(crate) fn permute_controlled(
        &mut self,
        control: usize,
        register: Register,
        map: impl Fn(usize) -> usize,
    ) {
        let ctrl_mask = 1 << control;
        let source = self.amplitudes.clone();
        for (i, amp) in source.iter().enumerate() {
            if i & ctrl_mask != 0 {
                let y = register.extract(i);
                let j = register.replace(i, map(y));
                if j != i {
                    self.amplitudes[j] = *amp;
                }
            }
        }
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quantum state ({} qubits)", self.num_qubits)?;
        writeln!(f, "Total basis states: {}", self.size())?;
        for (i, amp, p) in self.significant_states(NORMALIZATION_TOLERANCE) {
            let bits: String = (0..self.num_qubits)
                .rev()
                .map(|q| if (i >> q) & 1 == 1 { '1' } else { '0' })
                .collect();
            writeln!(
                f,
                "|{i}⟩ ({bits}): {:+.6}{:+.6}i (p = {p:.6})",
                amp.re, amp.im
            )?;
        }
        Ok(())
    }
}

//! Statevector simulation of reversible modular exponentiation
//!
//! This crate holds a dense `2^n` amplitude vector and applies gates to it in
//! place. On top of six primitive gates it provides reversible arithmetic
//! (adder, equality comparator, controlled subtractor) and a controlled
//! modular multiplier, which together drive the modular-exponentiation stage
//! of Shor's algorithm:
//!
//! ```text
//! Σ_x |x⟩|1⟩  →  Σ_x |x⟩|base^x mod N⟩
//! ```
//!
//! # Core Components
//!
//! - **State**: [`StateVector`], `2^n` [`Complex64`](num_complex::Complex64)
//!   amplitudes where bit `q` of an index is qubit `q`
//! - **Registers**: [`Register`] for contiguous qubit ranges read as integers
//! - **Gates**: [`Gate`], a closed set of primitives and arithmetic composites
//! - **Circuits**: [`Circuit`], an ordered gate list with validated application
//! - **Driver**: [`ModularExponentiation`] and its [`VerificationReport`]
//!
//! # Example: Modular Exponentiation
//!
//! ```rust
//! use qmodexp_sim::{ModExpConfig, ModularExponentiation};
//!
//! let driver = ModularExponentiation::new(ModExpConfig::new(7, 15, 4)).unwrap();
//! let run = driver.run().unwrap();
//!
//! // 4 exponent qubits + 4 target qubits
//! assert_eq!(run.state.num_qubits(), 8);
//! assert!(run.verify().all_passed());
//! ```
//!
//! # Example: Adding Two Registers
//!
//! ```rust
//! use qmodexp_sim::{Adder, Gate, Register, StateVector};
//!
//! // a = q[0..=3], b = q[4..=7], carries = q[8..=12]
//! let adder = Adder::new(0, 4, 8, 4).unwrap();
//! let a = Register::new(0, 4);
//! let b = Register::new(4, 4);
//!
//! let mut state = StateVector::basis(13, b.replace(a.replace(0, 3), 4)).unwrap();
//! Gate::from(adder).apply(&mut state).unwrap();
//!
//! assert_eq!(state.most_likely_value(b).unwrap(), 7);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X` | 1 | Pauli-X |
//! | `P(θ)` | 1 | Phase shift |
//! | `CX` | 2 | Controlled-NOT |
//! | `Swap` | 2 | SWAP gate |
//! | `CCX` | 3 | Toffoli |
//! | `Adder` | 3·bits + 1 | Ripple-carry addition |
//! | `Comparator` | 3·bits + 1 | Equality test |
//! | `ConditionalSubtractor` | 3·bits + 3 | Controlled `b − a` |
//! | `ControlledModMul` | 1 + target | `y → k·y mod N` under a control |

pub mod arithmetic;
pub mod circuit;
pub mod classical;
pub mod error;
pub mod exponentiation;
pub mod gate;
pub mod register;
pub mod state;

pub use arithmetic::{Adder, Comparator, ConditionalSubtractor, ControlledModMul};
pub use circuit::Circuit;
pub use classical::{gcd, is_coprime, mod_inverse, mod_pow, squared_powers};
pub use error::{SimError, SimResult};
pub use exponentiation::{
    BranchResult, ModExpConfig, ModExpLayout, ModExpRun, ModularExponentiation,
    VerificationReport,
};
pub use gate::Gate;
pub use register::{Register, extract_bits, replace_bits};
pub use state::{MAX_QUBITS, StateVector};

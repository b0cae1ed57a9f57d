//! `arvak-statevector`: dense statevector engine.
//!
//! Maintains a complex amplitude vector over `n` qubits and exposes:
//!
//! - **Unitary application**: [`StateVector::apply`] tensor-expands a small
//!   [`Unitary`] block over the untouched qubits, optionally conditioned on
//!   control qubits ([`StateVector::apply_controlled`]).
//! - **Invertible sequences**: [`Circuit`] collects gates and blocks,
//!   [`Circuit::inverse`] yields the exact adjoint sequence, and
//!   [`Circuit::num_ops`] / [`Circuit::depth`] report the resource cost.
//! - **Postselection**: [`StateVector::measure`] projects a qubit onto an
//!   outcome and returns the probability mass of that outcome.
//!
//! Memory is `O(2^n)`; the register ceiling is checked before allocation.
//!
//! # Example
//!
//! ```rust
//! use arvak_statevector::{StandardGate, StateVector};
//!
//! let mut sv = StateVector::new(1, 20).unwrap();
//! sv.apply(&StandardGate::H.unitary(), &[0]).unwrap();
//! let p = sv.measure(0, true).unwrap();
//! assert!((p - 0.5).abs() < 1e-12);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod statevector;
pub mod unitary;

pub use circuit::{Circuit, Control, Operation, OperationKind};
pub use error::{EngineError, EngineResult};
pub use gate::StandardGate;
pub use statevector::StateVector;
pub use unitary::{DEFAULT_UNITARY_TOLERANCE, Unitary};

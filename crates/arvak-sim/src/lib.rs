//! `arvak-sim`: Hamiltonian time-evolution operators.
//!
//! Converts a Hermitian matrix or a sum-of-Paulis Hamiltonian into a dense
//! [`Unitary`](arvak_statevector::Unitary) approximating `exp(-i H t)` using:
//!
//! - **Exact** diagonalisation (`V · diag(e^{-iλt}) · V†`)
//! - **Trotter** first-order product formula
//! - **Suzuki** recursive symmetric product formulas of any order
//!
//! Every builder returns an [`Evolution`] carrying the operator and the
//! elementary-gate cost of the circuit it stands for.
//!
//! # Quick start
//!
//! ```rust
//! use arvak_sim::hamiltonian::{Hamiltonian, HamiltonianTerm};
//! use arvak_sim::trotter::TrotterEvolution;
//!
//! // Transverse-field Ising model: H = -J·ZZ - h·X
//! let h = Hamiltonian::from_terms(vec![
//!     HamiltonianTerm::zz(0, 1, -1.0),   // -J ZZ
//!     HamiltonianTerm::x(0, -0.5),        // -h X₀
//!     HamiltonianTerm::x(1, -0.5),        // -h X₁
//! ]);
//!
//! let evol = TrotterEvolution::new(h, 1.0 /* t */, 10 /* steps */);
//! let op = evol.first_order().unwrap();
//! assert_eq!(op.unitary.num_qubits(), 2);
//! ```

pub mod error;
pub mod exact;
pub mod hamiltonian;
pub mod synthesis;
pub mod trotter;

pub use error::{SimError, SimResult};
pub use exact::{ExactEvolution, eigenvalues, spectral_radius};
pub use hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp, PauliString, check_hermitian};
pub use synthesis::Evolution;
pub use trotter::TrotterEvolution;

//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced by Hamiltonian time-evolution construction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Hamiltonian contains no terms.
    #[error("Hamiltonian is empty: no terms to evolve")]
    EmptyHamiltonian,

    /// A Pauli string references a qubit index that is out of range.
    #[error("Pauli string references qubit {qubit} but the register only has {n_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: u32,
        /// Number of qubits in the target register.
        n_qubits: u32,
    },

    /// Matrix dimension is not a power of two (or the matrix is not square).
    #[error("matrix of shape {rows}x{cols} is not a square power-of-two operator")]
    InvalidDimension {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// Matrix deviates from its conjugate transpose by more than the tolerance.
    #[error("matrix is not Hermitian (max |A - A†| entry = {deviation:e})")]
    NotHermitian {
        /// Largest entry-wise deviation found.
        deviation: f64,
    },

    /// n_steps must be ≥ 1.
    #[error("n_steps must be at least 1, got {0}")]
    InvalidSteps(usize),

    /// Suzuki expansion order must be ≥ 1.
    #[error("expansion order must be at least 1, got {0}")]
    InvalidOrder(u32),

    /// Statevector engine returned an error.
    #[error("engine error: {0}")]
    Engine(#[from] arvak_statevector::EngineError),
}

/// Result type for time-evolution operations.
pub type SimResult<T> = Result<T, SimError>;

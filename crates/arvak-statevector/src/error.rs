//! Error types for the statevector engine.

use thiserror::Error;

/// Errors produced by the statevector engine.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The requested register would exceed the configured qubit ceiling.
    ///
    /// Raised before any amplitude memory is allocated.
    #[error("register of {requested} qubits exceeds the ceiling of {max} qubits")]
    RegisterTooLarge {
        /// Requested register width.
        requested: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// An operation does not fit the register or its own operand list.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// An amplitude vector handed to the engine does not have unit norm.
    #[error("amplitude vector is not normalized (norm² = {0})")]
    NotNormalized(f64),
}

/// Result type for statevector engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

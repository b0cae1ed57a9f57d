//! Error types for the HHL solver.

use std::path::PathBuf;

use arvak_sim::SimError;
use arvak_statevector::EngineError;
use thiserror::Error;

/// Errors produced while validating or running an HHL solve.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HhlError {
    /// Matrix is not square, not a power of two, not Hermitian, or does not
    /// match the vector length.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// Right-hand side is zero or contains non-finite entries.
    #[error("invalid vector: {0}")]
    InvalidVector(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be read or parsed.
    #[error("failed to load configuration from {}: {message}", path.display())]
    ConfigIo {
        /// File that was being loaded.
        path: PathBuf,
        /// Underlying I/O or parse error.
        message: String,
    },

    /// The full register would exceed `max_qubits`.
    #[error("register of {requested} qubits exceeds the ceiling of {max} qubits")]
    RegisterTooLarge {
        /// main + eigenvalue + ancilla qubits.
        requested: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// Internal contract violation reported by the statevector engine.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Time-evolution synthesis failed.
    #[error("evolution synthesis failed: {0}")]
    Sim(SimError),
}

impl From<EngineError> for HhlError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::RegisterTooLarge { requested, max } => {
                Self::RegisterTooLarge { requested, max }
            }
            EngineError::NotNormalized(norm) => {
                Self::InvalidVector(format!("amplitudes have norm² {norm}"))
            }
            EngineError::DimensionMismatch(msg) => Self::DimensionMismatch(msg),
            other => Self::DimensionMismatch(other.to_string()),
        }
    }
}

impl From<SimError> for HhlError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::InvalidDimension { rows, cols } => Self::InvalidDimension(format!(
                "matrix of shape {rows}x{cols} is not a square power-of-two matrix of at least 2x2"
            )),
            SimError::NotHermitian { deviation } => Self::InvalidDimension(format!(
                "matrix is not Hermitian (max |A - A†| entry = {deviation:e})"
            )),
            SimError::Engine(e) => e.into(),
            other => Self::Sim(other),
        }
    }
}

/// Result type for HHL operations.
pub type SolveResult<T> = Result<T, HhlError>;

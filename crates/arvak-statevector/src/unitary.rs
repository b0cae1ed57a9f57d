//! Dense unitary blocks.
//!
//! A [`Unitary`] is a `2^k × 2^k` complex matrix acting on `k` qubits.
//! Row and column indices follow the register convention used throughout
//! the engine: bit `i` of the index is the `i`-th target qubit.

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::error::{EngineError, EngineResult};

/// Tolerance used by [`Unitary::is_unitary`] when no explicit one is given.
pub const DEFAULT_UNITARY_TOLERANCE: f64 = 1e-9;

/// A dense unitary matrix on `num_qubits` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Unitary {
    matrix: DMatrix<Complex64>,
    num_qubits: usize,
}

impl Unitary {
    /// Wrap a square matrix whose dimension is a power of two.
    ///
    /// Unitarity itself is not checked here; use [`Unitary::is_unitary`].
    pub fn new(matrix: DMatrix<Complex64>) -> EngineResult<Self> {
        let dim = matrix.nrows();
        if dim != matrix.ncols() {
            return Err(EngineError::DimensionMismatch(format!(
                "unitary block must be square, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        if dim == 0 || !dim.is_power_of_two() {
            return Err(EngineError::DimensionMismatch(format!(
                "unitary block dimension {dim} is not a power of two"
            )));
        }
        Ok(Self {
            num_qubits: dim.trailing_zeros() as usize,
            matrix,
        })
    }

    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        let dim = 1usize << num_qubits;
        Self {
            matrix: DMatrix::identity(dim, dim),
            num_qubits,
        }
    }

    /// Number of qubits the block acts on.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Matrix dimension (`2^num_qubits`).
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Borrow the underlying matrix.
    pub fn matrix(&self) -> &DMatrix<Complex64> {
        &self.matrix
    }

    /// Consume the block and return the underlying matrix.
    pub fn into_matrix(self) -> DMatrix<Complex64> {
        self.matrix
    }

    /// Conjugate transpose (U†), the inverse of a unitary.
    #[must_use]
    pub fn dagger(&self) -> Self {
        Self {
            matrix: self.matrix.adjoint(),
            num_qubits: self.num_qubits,
        }
    }

    /// The block obtained by applying `self` first and `next` afterwards
    /// (`next · self`).
    pub fn then(&self, next: &Unitary) -> EngineResult<Self> {
        if self.num_qubits != next.num_qubits {
            return Err(EngineError::DimensionMismatch(format!(
                "cannot compose a {}-qubit block with a {}-qubit block",
                self.num_qubits, next.num_qubits
            )));
        }
        Ok(Self {
            matrix: &next.matrix * &self.matrix,
            num_qubits: self.num_qubits,
        })
    }

    /// `U^exponent` by binary exponentiation.
    #[must_use]
    pub fn pow(&self, exponent: u64) -> Self {
        let mut result = DMatrix::<Complex64>::identity(self.dim(), self.dim());
        let mut base = self.matrix.clone();
        let mut e = exponent;
        while e > 0 {
            if e & 1 == 1 {
                result = &result * &base;
            }
            e >>= 1;
            if e > 0 {
                base = &base * &base;
            }
        }
        Self {
            matrix: result,
            num_qubits: self.num_qubits,
        }
    }

    /// `U²`.
    #[must_use]
    pub fn squared(&self) -> Self {
        Self {
            matrix: &self.matrix * &self.matrix,
            num_qubits: self.num_qubits,
        }
    }

    /// Check `U†U ≈ I` within `tolerance` (Frobenius norm).
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let dim = self.dim();
        let product = self.matrix.adjoint() * &self.matrix;
        (product - DMatrix::<Complex64>::identity(dim, dim)).norm() < tolerance
    }

    /// A permutation block mapping basis state `i` to `permutation[i]`.
    pub fn permutation(permutation: &[usize]) -> EngineResult<Self> {
        let dim = permutation.len();
        let mut seen = vec![false; dim];
        let mut matrix = DMatrix::<Complex64>::zeros(dim, dim);
        for (source, &dest) in permutation.iter().enumerate() {
            if dest >= dim || seen[dest] {
                return Err(EngineError::DimensionMismatch(format!(
                    "permutation entry {source} -> {dest} is not a bijection on {dim} states"
                )));
            }
            seen[dest] = true;
            matrix[(dest, source)] = Complex64::new(1.0, 0.0);
        }
        Self::new(matrix)
    }
}

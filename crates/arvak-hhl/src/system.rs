//! Validated linear systems `A·x = b`.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::error::{HhlError, SolveResult};

/// A Hermitian `2^n × 2^n` matrix with a nonzero right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    matrix: DMatrix<Complex64>,
    rhs: DVector<Complex64>,
    num_qubits: usize,
    rhs_norm: f64,
}

impl LinearSystem {
    /// Validate `matrix` and `rhs`.
    ///
    /// `tolerance` bounds the entry-wise `|A_ij - conj(A_ji)|` test.
    pub fn new(
        matrix: DMatrix<Complex64>,
        rhs: DVector<Complex64>,
        tolerance: f64,
    ) -> SolveResult<Self> {
        let num_qubits = arvak_sim::check_hermitian(&matrix, tolerance)? as usize;
        if rhs.len() != matrix.nrows() {
            return Err(HhlError::InvalidDimension(format!(
                "vector of length {} does not match a {}x{} matrix",
                rhs.len(),
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        if matrix.iter().any(|v| !(v.re.is_finite() && v.im.is_finite())) {
            return Err(HhlError::InvalidDimension(
                "matrix has non-finite entries".to_string(),
            ));
        }
        if rhs.iter().any(|v| !(v.re.is_finite() && v.im.is_finite())) {
            return Err(HhlError::InvalidVector(
                "vector has non-finite entries".to_string(),
            ));
        }
        let rhs_norm = rhs.norm();
        if rhs_norm <= f64::MIN_POSITIVE {
            return Err(HhlError::InvalidVector("vector has zero norm".to_string()));
        }
        Ok(Self {
            matrix,
            rhs,
            num_qubits,
            rhs_norm,
        })
    }

    /// Build from real row-major entries.
    pub fn from_real(matrix: &[f64], rhs: &[f64], tolerance: f64) -> SolveResult<Self> {
        let dim = rhs.len();
        if matrix.len() != dim * dim {
            return Err(HhlError::InvalidDimension(format!(
                "{} matrix entries do not form a {dim}x{dim} matrix",
                matrix.len()
            )));
        }
        Self::new(
            DMatrix::from_row_slice(dim, dim, matrix).map(|v| Complex64::new(v, 0.0)),
            DVector::from_iterator(dim, rhs.iter().map(|&v| Complex64::new(v, 0.0))),
            tolerance,
        )
    }

    /// Build from complex row-major entries.
    pub fn from_complex(
        matrix: &[Complex64],
        rhs: &[Complex64],
        tolerance: f64,
    ) -> SolveResult<Self> {
        let dim = rhs.len();
        if matrix.len() != dim * dim {
            return Err(HhlError::InvalidDimension(format!(
                "{} matrix entries do not form a {dim}x{dim} matrix",
                matrix.len()
            )));
        }
        Self::new(
            DMatrix::from_row_slice(dim, dim, matrix),
            DVector::from_column_slice(rhs),
            tolerance,
        )
    }

    /// The matrix A.
    pub fn matrix(&self) -> &DMatrix<Complex64> {
        &self.matrix
    }

    /// The right-hand side b.
    pub fn rhs(&self) -> &DVector<Complex64> {
        &self.rhs
    }

    /// Main-register width n.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension `2^n`.
    pub fn dim(&self) -> usize {
        self.rhs.len()
    }

    /// `‖b‖`.
    pub fn rhs_norm(&self) -> f64 {
        self.rhs_norm
    }

    /// `b / ‖b‖` as amplitudes.
    pub fn normalized_rhs(&self) -> Vec<Complex64> {
        self.rhs.iter().map(|v| *v / self.rhs_norm).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_real() {
        let system = LinearSystem::from_real(&[1.0, 0.0, 0.0, 2.0], &[3.0, 4.0], 1e-9).unwrap();
        assert_eq!(system.num_qubits(), 1);
        assert!((system.rhs_norm() - 5.0).abs() < 1e-12);
        let amps = system.normalized_rhs();
        assert!((amps[0].re - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_zero_vector() {
        assert!(matches!(
            LinearSystem::from_real(&[1.0, 0.0, 0.0, 1.0], &[0.0, 0.0], 1e-9),
            Err(HhlError::InvalidVector(_))
        ));
    }

    #[test]
    fn test_rejects_non_hermitian() {
        assert!(matches!(
            LinearSystem::from_real(&[1.0, 2.0, 0.0, 1.0], &[1.0, 0.0], 1e-9),
            Err(HhlError::InvalidDimension(_))
        ));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let matrix = DMatrix::<Complex64>::identity(4, 4);
        let rhs = DVector::from_element(2, Complex64::new(1.0, 0.0));
        assert!(matches!(
            LinearSystem::new(matrix, rhs, 1e-9),
            Err(HhlError::InvalidDimension(_))
        ));
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        assert!(matches!(
            LinearSystem::from_real(&[1.0; 9], &[1.0; 3], 1e-9),
            Err(HhlError::InvalidDimension(_))
        ));
    }
}

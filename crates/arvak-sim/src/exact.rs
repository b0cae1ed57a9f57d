//! Exact time evolution by diagonalisation.
//!
//! For Hermitian `A = V · diag(λ) · V†`,
//!
//!   exp(-i A t) = V · diag(e^{-i λ_j t}) · V†
//!
//! Used as the reference against which product formulas are measured and
//! as the evolution operator when no Trotter error is wanted.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use num_complex::Complex64;
use tracing::debug;

use arvak_statevector::Unitary;

use crate::error::SimResult;
use crate::hamiltonian::check_hermitian;
use crate::synthesis::Evolution;

/// Exact `exp(-iAt)` builder for a dense Hermitian matrix.
pub struct ExactEvolution {
    eigen: SymmetricEigen<Complex64, nalgebra::Dyn>,
    t: f64,
}

impl ExactEvolution {
    /// Diagonalise `matrix` after checking that it is Hermitian within
    /// `tolerance`.
    pub fn new(matrix: &DMatrix<Complex64>, t: f64, tolerance: f64) -> SimResult<Self> {
        let n_qubits = check_hermitian(matrix, tolerance)?;
        debug!(n_qubits, t, "diagonalising for exact evolution");
        Ok(Self {
            eigen: SymmetricEigen::new(matrix.clone()),
            t,
        })
    }

    /// Eigenvalues in the order nalgebra returns them.
    pub fn eigenvalues(&self) -> &DVector<f64> {
        &self.eigen.eigenvalues
    }

    /// Build `exp(-iAt)`. Charged as a single operation.
    pub fn build(&self) -> SimResult<Evolution> {
        let phases = self
            .eigen
            .eigenvalues
            .map(|lambda| Complex64::from_polar(1.0, -lambda * self.t));
        let v = &self.eigen.eigenvectors;
        let matrix = v * DMatrix::from_diagonal(&phases) * v.adjoint();
        Ok(Evolution {
            unitary: Unitary::new(matrix)?,
            cost: 1,
        })
    }
}

/// Real eigenvalues of a Hermitian matrix, sorted ascending.
pub fn eigenvalues(matrix: &DMatrix<Complex64>, tolerance: f64) -> SimResult<Vec<f64>> {
    check_hermitian(matrix, tolerance)?;
    let mut values: Vec<f64> = SymmetricEigen::new(matrix.clone())
        .eigenvalues
        .iter()
        .copied()
        .collect();
    values.sort_by(f64::total_cmp);
    Ok(values)
}

/// Largest eigenvalue magnitude (spectral radius) of a Hermitian matrix.
pub fn spectral_radius(matrix: &DMatrix<Complex64>, tolerance: f64) -> SimResult<f64> {
    Ok(eigenvalues(matrix, tolerance)?
        .into_iter()
        .fold(0.0, |acc: f64, v| acc.max(v.abs())))
}

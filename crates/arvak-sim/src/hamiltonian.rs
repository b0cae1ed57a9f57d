//! Hamiltonian data structures.
//!
//! A Hamiltonian is a sum of weighted Pauli strings:
//!
//!   H = Σ_k  c_k · P_k
//!
//! where each P_k is a tensor product of single-qubit Pauli operators
//! (I, X, Y, Z) and c_k ∈ ℝ. Any Hermitian `2^n × 2^n` matrix has such a
//! decomposition with `c_k = Tr(P_k · A) / 2^n`.
//!
//! # Example
//!
//! ```rust
//! use arvak_sim::hamiltonian::{Hamiltonian, PauliOp};
//! use nalgebra::DMatrix;
//! use num_complex::Complex64;
//!
//! // A = [[1, 3], [3, 2]] = 1.5·I + 3·X - 0.5·Z
//! let a = DMatrix::from_row_slice(2, 2, &[1.0, 3.0, 3.0, 2.0]).map(|v| Complex64::new(v, 0.0));
//! let h = Hamiltonian::from_hermitian(&a, 1e-9).unwrap();
//! assert_eq!(h.n_terms(), 3);
//! assert!((h.lambda() - 5.0).abs() < 1e-12);
//! assert!(h.terms().iter().any(|t| t.pauli.ops() == &[(0, PauliOp::X)]));
//! ```

use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Coefficients below this magnitude are dropped by [`Hamiltonian::from_hermitian`].
const COEFF_CUTOFF: f64 = 1e-12;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// Matrix element ⟨row|P|col⟩ for single-bit indices.
    pub fn element(self, row: usize, col: usize) -> Complex64 {
        match (self, row, col) {
            (Self::I, r, c) if r == c => Complex64::new(1.0, 0.0),
            (Self::X, r, c) if r != c => Complex64::new(1.0, 0.0),
            (Self::Y, 0, 1) => Complex64::new(0.0, -1.0),
            (Self::Y, 1, 0) => Complex64::new(0.0, 1.0),
            (Self::Z, 0, 0) => Complex64::new(1.0, 0.0),
            (Self::Z, 1, 1) => Complex64::new(-1.0, 0.0),
            _ => Complex64::new(0.0, 0.0),
        }
    }

    /// True for X and Y, which flip the computational basis state.
    pub fn flips(self) -> bool {
        matches!(self, Self::X | Self::Y)
    }
}

/// A tensor product of Pauli operators on named qubits.
///
/// Stored as a sorted `Vec<(qubit_index, PauliOp)>` with Identity terms
/// omitted.  Qubits not listed are implicitly I.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    /// Non-identity terms, sorted by qubit index ascending.
    ops: Vec<(u32, PauliOp)>,
}

impl PauliString {
    /// Construct a PauliString from an iterator of (qubit, op) pairs.
    ///
    /// Identity operators are dropped; the remaining ops are sorted by qubit.
    pub fn from_ops(ops: impl IntoIterator<Item = (u32, PauliOp)>) -> Self {
        let mut v: Vec<(u32, PauliOp)> = ops
            .into_iter()
            .filter(|(_, op)| *op != PauliOp::I)
            .collect();
        v.sort_by_key(|(q, _)| *q);
        Self { ops: v }
    }

    /// The all-identity string.
    pub fn identity() -> Self {
        Self { ops: Vec::new() }
    }

    /// Return the non-identity (qubit, op) pairs, sorted by qubit index.
    pub fn ops(&self) -> &[(u32, PauliOp)] {
        &self.ops
    }

    /// True if there are no non-identity operators.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// The highest qubit index referenced, or `None` for an identity string.
    pub fn max_qubit(&self) -> Option<u32> {
        self.ops.last().map(|(q, _)| *q)
    }

    /// Bit mask of the qubits whose basis state the string flips.
    pub fn flip_mask(&self) -> usize {
        self.ops
            .iter()
            .filter(|(_, op)| op.flips())
            .fold(0, |acc, (q, _)| acc | (1 << q))
    }

    /// Matrix element ⟨row|P|col⟩ on the full register.
    pub fn element(&self, row: usize, col: usize) -> Complex64 {
        if (row ^ col) != self.flip_mask() {
            return Complex64::new(0.0, 0.0);
        }
        self.ops
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, &(q, op)| {
                acc * op.element((row >> q) & 1, (col >> q) & 1)
            })
    }

    /// Dense matrix on an `n_qubits` register.
    pub fn to_matrix(&self, n_qubits: u32) -> SimResult<DMatrix<Complex64>> {
        if let Some(q) = self.max_qubit().filter(|&q| q >= n_qubits) {
            return Err(SimError::QubitOutOfRange { qubit: q, n_qubits });
        }
        let dim = 1usize << n_qubits;
        let flip = self.flip_mask();
        let mut m = DMatrix::<Complex64>::zeros(dim, dim);
        for row in 0..dim {
            m[(row, row ^ flip)] = self.element(row, row ^ flip);
        }
        Ok(m)
    }
}

/// A single weighted Pauli term: `coeff · pauli`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HamiltonianTerm {
    /// Real coefficient.
    pub coeff: f64,
    /// The Pauli string.
    pub pauli: PauliString,
}

impl HamiltonianTerm {
    /// Create a new term.
    pub fn new(coeff: f64, pauli: PauliString) -> Self {
        Self { coeff, pauli }
    }

    /// Shorthand: `coeff · I`.
    pub fn identity(coeff: f64) -> Self {
        Self::new(coeff, PauliString::identity())
    }

    /// Shorthand: single-qubit Z term.
    pub fn z(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::Z)]))
    }

    /// Shorthand: ZZ coupling term.
    pub fn zz(q0: u32, q1: u32, coeff: f64) -> Self {
        Self::new(
            coeff,
            PauliString::from_ops([(q0, PauliOp::Z), (q1, PauliOp::Z)]),
        )
    }

    /// Shorthand: single-qubit X term.
    pub fn x(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::X)]))
    }
}

/// A sum-of-Pauli-strings Hamiltonian on a fixed register width.
///
/// H = Σ_k  c_k · P_k
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hamiltonian {
    terms: Vec<HamiltonianTerm>,
    n_qubits: u32,
}

impl Hamiltonian {
    /// Create from a list of terms; the width is the smallest register that
    /// holds every term.
    pub fn from_terms(terms: Vec<HamiltonianTerm>) -> Self {
        let n_qubits = min_qubits(&terms);
        Self { terms, n_qubits }
    }

    /// Decompose a Hermitian `2^n × 2^n` matrix into Pauli strings.
    ///
    /// `tolerance` bounds the entry-wise Hermitian-symmetry test. The
    /// identity component is kept: under controlled evolution it is an
    /// observable relative phase, not a global one.
    pub fn from_hermitian(matrix: &DMatrix<Complex64>, tolerance: f64) -> SimResult<Self> {
        let n_qubits = check_hermitian(matrix, tolerance)?;
        let dim = matrix.nrows();
        let mut terms = Vec::new();

        for code in 0..(1usize << (2 * n_qubits)) {
            let pauli = PauliString::from_ops((0..n_qubits).map(|q| {
                let op = match (code >> (2 * q)) & 0b11 {
                    0 => PauliOp::I,
                    1 => PauliOp::X,
                    2 => PauliOp::Y,
                    _ => PauliOp::Z,
                };
                (q, op)
            }));
            let flip = pauli.flip_mask();
            // Tr(P·A) = Σ_j P[j, j⊕flip] · A[j⊕flip, j]
            let trace: Complex64 = (0..dim)
                .map(|j| pauli.element(j, j ^ flip) * matrix[(j ^ flip, j)])
                .sum();
            let coeff = trace.re / dim as f64;
            if coeff.abs() > COEFF_CUTOFF {
                terms.push(HamiltonianTerm::new(coeff, pauli));
            }
        }

        Ok(Self { terms, n_qubits })
    }

    /// Override the register width.
    #[must_use]
    pub fn with_n_qubits(mut self, n: u32) -> Self {
        self.n_qubits = n;
        self
    }

    /// All terms.
    pub fn terms(&self) -> &[HamiltonianTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Register width.
    pub fn n_qubits(&self) -> u32 {
        self.n_qubits
    }

    /// Spectral norm upper bound: Σ |c_k|.
    pub fn lambda(&self) -> f64 {
        self.terms.iter().map(|t| t.coeff.abs()).sum()
    }

    /// Reassemble the dense matrix Σ c_k P_k.
    pub fn to_matrix(&self) -> SimResult<DMatrix<Complex64>> {
        let dim = 1usize << self.n_qubits;
        let mut m = DMatrix::<Complex64>::zeros(dim, dim);
        for term in &self.terms {
            m += term.pauli.to_matrix(self.n_qubits)? * Complex64::new(term.coeff, 0.0);
        }
        Ok(m)
    }
}

impl FromIterator<HamiltonianTerm> for Hamiltonian {
    fn from_iter<T: IntoIterator<Item = HamiltonianTerm>>(iter: T) -> Self {
        Self::from_terms(iter.into_iter().collect())
    }
}

/// The minimum number of qubits required to represent `terms`.
fn min_qubits(terms: &[HamiltonianTerm]) -> u32 {
    terms
        .iter()
        .filter_map(|t| t.pauli.max_qubit())
        .max()
        .map_or(0, |q| q + 1)
}

/// Validate shape and Hermitian symmetry; returns the qubit count.
pub fn check_hermitian(matrix: &DMatrix<Complex64>, tolerance: f64) -> SimResult<u32> {
    let (rows, cols) = matrix.shape();
    if rows != cols || rows < 2 || !rows.is_power_of_two() {
        return Err(SimError::InvalidDimension { rows, cols });
    }
    let mut deviation = 0.0f64;
    for i in 0..rows {
        for j in i..cols {
            deviation = deviation.max((matrix[(i, j)] - matrix[(j, i)].conj()).norm());
        }
    }
    if deviation > tolerance {
        return Err(SimError::NotHermitian { deviation });
    }
    Ok(rows.trailing_zeros())
}

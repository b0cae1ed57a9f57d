//! Tests for Pauli strings and Hermitian-matrix decomposition.

use arvak_sim::SimError;
use arvak_sim::hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp, PauliString};
use nalgebra::DMatrix;
use num_complex::Complex64;

fn real(rows: usize, data: &[f64]) -> DMatrix<Complex64> {
    DMatrix::from_row_slice(rows, rows, data).map(|v| Complex64::new(v, 0.0))
}

// ---------------------------------------------------------------------------
// Pauli strings
// ---------------------------------------------------------------------------

#[test]
fn pauli_string_canonical_form() {
    let a = PauliString::from_ops([(2, PauliOp::Z), (0, PauliOp::I), (1, PauliOp::X)]);
    let b = PauliString::from_ops([(1, PauliOp::X), (2, PauliOp::Z)]);
    assert_eq!(a, b);
    assert_eq!(a.ops(), &[(1, PauliOp::X), (2, PauliOp::Z)]);
    assert_eq!(a.max_qubit(), Some(2));
    assert_eq!(PauliString::identity().max_qubit(), None);
}

#[test]
fn flip_mask_covers_x_and_y_only() {
    let ps = PauliString::from_ops([(0, PauliOp::X), (1, PauliOp::Z), (3, PauliOp::Y)]);
    assert_eq!(ps.flip_mask(), 0b1001);
    assert_eq!(PauliString::from_ops([(4, PauliOp::Z)]).flip_mask(), 0);
}

#[test]
fn element_matches_kronecker_product() {
    // X on qubit 0, Z on qubit 1: X ⊗ Z in little-endian order.
    let ps = PauliString::from_ops([(0, PauliOp::X), (1, PauliOp::Z)]);
    let m = ps.to_matrix(2).unwrap();
    for row in 0..4 {
        for col in 0..4 {
            let expected = if row ^ col == 1 {
                if row & 2 == 0 { 1.0 } else { -1.0 }
            } else {
                0.0
            };
            assert_eq!(m[(row, col)], Complex64::new(expected, 0.0), "({row}, {col})");
            assert_eq!(ps.element(row, col), m[(row, col)]);
        }
    }
}

#[test]
fn identity_string_is_identity_matrix() {
    let m = PauliString::identity().to_matrix(2).unwrap();
    assert_eq!(m, DMatrix::identity(4, 4));
}

// ---------------------------------------------------------------------------
// Hamiltonian
// ---------------------------------------------------------------------------

#[test]
fn width_follows_highest_qubit() {
    let h: Hamiltonian = [HamiltonianTerm::z(0, 1.0), HamiltonianTerm::zz(1, 3, 0.5)]
        .into_iter()
        .collect();
    assert_eq!(h.n_qubits(), 4);
    assert_eq!(h.with_n_qubits(6).n_qubits(), 6);
    assert_eq!(Hamiltonian::from_terms(vec![]).n_qubits(), 0);
}

#[test]
fn to_matrix_sums_terms() {
    // 0.5·I + Z on one qubit = diag(1.5, -0.5)
    let h = Hamiltonian::from_terms(vec![
        HamiltonianTerm::identity(0.5),
        HamiltonianTerm::z(0, 1.0),
    ])
    .with_n_qubits(1);
    let m = h.to_matrix().unwrap();
    assert_eq!(m, real(2, &[1.5, 0.0, 0.0, -0.5]));
}

#[test]
fn lambda_bounds_spectral_radius() {
    let h = Hamiltonian::from_terms(vec![
        HamiltonianTerm::zz(0, 1, -1.0),
        HamiltonianTerm::x(0, 0.5),
        HamiltonianTerm::x(1, -0.5),
    ]);
    assert!((h.lambda() - 2.0).abs() < 1e-12);
    let m = h.to_matrix().unwrap();
    let radius = m
        .map(|c| c.re)
        .symmetric_eigenvalues()
        .iter()
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    assert!(radius <= h.lambda() + 1e-12);
}

#[test]
fn pauli_string_y_matrix() {
    let y = PauliString::from_ops([(0, PauliOp::Y)]).to_matrix(1).unwrap();
    assert_eq!(y[(0, 1)], Complex64::new(0.0, -1.0));
    assert_eq!(y[(1, 0)], Complex64::new(0.0, 1.0));
}

#[test]
fn pauli_string_out_of_range() {
    let ps = PauliString::from_ops([(3, PauliOp::X)]);
    assert!(matches!(
        ps.to_matrix(2),
        Err(SimError::QubitOutOfRange { qubit: 3, n_qubits: 2 })
    ));
}

// ---------------------------------------------------------------------------
// Pauli decomposition
// ---------------------------------------------------------------------------

#[test]
fn from_hermitian_diagonal() {
    // diag(1, 2) = 1.5·I − 0.5·Z
    let h = Hamiltonian::from_hermitian(&real(2, &[1.0, 0.0, 0.0, 2.0]), 1e-9).unwrap();
    assert_eq!(h.n_qubits(), 1);
    assert_eq!(h.n_terms(), 2);
    let z = h.terms().iter().find(|t| !t.pauli.is_identity()).unwrap();
    assert_eq!(z.pauli.ops(), &[(0, PauliOp::Z)]);
    assert!((z.coeff + 0.5).abs() < 1e-12);
}

#[test]
fn from_hermitian_reconstructs_matrix() {
    let a = DMatrix::from_row_slice(
        4,
        4,
        &[
            Complex64::new(2.0, 0.0),
            Complex64::new(0.5, 0.25),
            Complex64::new(0.0, 0.0),
            Complex64::new(-0.1, 0.0),
            Complex64::new(0.5, -0.25),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.3, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.3, 0.0),
            Complex64::new(-1.0, 0.0),
            Complex64::new(0.0, 0.7),
            Complex64::new(-0.1, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, -0.7),
            Complex64::new(0.5, 0.0),
        ],
    );
    let h = Hamiltonian::from_hermitian(&a, 1e-9).unwrap();
    assert_eq!(h.n_qubits(), 2);
    let rebuilt = h.to_matrix().unwrap();
    assert!((rebuilt - a).norm() < 1e-12);
}

#[test]
fn from_hermitian_rejects_bad_shapes() {
    let three = real(3, &[1.0; 9]);
    assert!(matches!(
        Hamiltonian::from_hermitian(&three, 1e-9),
        Err(SimError::InvalidDimension { rows: 3, cols: 3 })
    ));
    let one = real(1, &[1.0]);
    assert!(matches!(
        Hamiltonian::from_hermitian(&one, 1e-9),
        Err(SimError::InvalidDimension { .. })
    ));
}

#[test]
fn from_hermitian_rejects_asymmetric() {
    let a = real(2, &[1.0, 0.5, 0.4, 1.0]);
    assert!(matches!(
        Hamiltonian::from_hermitian(&a, 1e-9),
        Err(SimError::NotHermitian { .. })
    ));
    // Within a loose tolerance the same matrix is accepted.
    assert!(Hamiltonian::from_hermitian(&a, 0.2).is_ok());
}

//! Tests for Trotter product-formula synthesis.

use arvak_sim::SimError;
use arvak_sim::exact::ExactEvolution;
use arvak_sim::hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp, PauliString};
use arvak_sim::trotter::TrotterEvolution;
use arvak_statevector::DEFAULT_UNITARY_TOLERANCE;

fn ising() -> Hamiltonian {
    // H = -ZZ - 0.5 X₀ - 0.5 X₁  (transverse-field Ising, 2 qubits)
    Hamiltonian::from_terms(vec![
        HamiltonianTerm::zz(0, 1, -1.0),
        HamiltonianTerm::x(0, -0.5),
        HamiltonianTerm::x(1, -0.5),
    ])
}

fn exact_distance(h: &Hamiltonian, t: f64, approx: &arvak_sim::Evolution) -> f64 {
    let exact = ExactEvolution::new(&h.to_matrix().unwrap(), t, 1e-9)
        .unwrap()
        .build()
        .unwrap();
    (exact.unitary.matrix() - approx.unitary.matrix()).norm()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn empty_hamiltonian_returns_error() {
    let h = Hamiltonian::from_terms(vec![]);
    let evol = TrotterEvolution::new(h, 1.0, 1);
    assert!(matches!(
        evol.first_order(),
        Err(SimError::EmptyHamiltonian)
    ));
    let h2 = Hamiltonian::from_terms(vec![]);
    let evol2 = TrotterEvolution::new(h2, 1.0, 1);
    assert!(matches!(
        evol2.second_order(),
        Err(SimError::EmptyHamiltonian)
    ));
}

#[test]
fn zero_steps_returns_error() {
    let h = Hamiltonian::from_terms(vec![HamiltonianTerm::z(0, 1.0)]);
    let evol = TrotterEvolution::new(h, 1.0, 0);
    assert!(matches!(evol.first_order(), Err(SimError::InvalidSteps(0))));
}

#[test]
fn zero_order_returns_error() {
    let evol = TrotterEvolution::new(ising(), 1.0, 1);
    assert!(matches!(evol.suzuki(0), Err(SimError::InvalidOrder(0))));
}

#[test]
fn qubit_out_of_range_returns_error() {
    // Term references qubit 5 but register width is 2 (from with_n_qubits).
    let h = Hamiltonian::from_terms(vec![HamiltonianTerm::z(5, 1.0)]);
    let evol = TrotterEvolution::new(h, 1.0, 1).with_n_qubits(2);
    assert!(matches!(
        evol.first_order(),
        Err(SimError::QubitOutOfRange { .. })
    ));
}

// ---------------------------------------------------------------------------
// Operator structure
// ---------------------------------------------------------------------------

#[test]
fn first_order_qubit_count_inferred() {
    let h = Hamiltonian::from_terms(vec![
        HamiltonianTerm::zz(0, 1, 1.0),
        HamiltonianTerm::z(2, -0.5),
    ]);
    let evol = TrotterEvolution::new(h, 1.0, 1);
    let op = evol.first_order().unwrap();
    assert_eq!(op.unitary.num_qubits(), 3);
}

#[test]
fn with_n_qubits_overrides_inferred_width() {
    let h = Hamiltonian::from_terms(vec![HamiltonianTerm::z(0, 1.0)]);
    let evol = TrotterEvolution::new(h, 1.0, 1).with_n_qubits(3);
    let op = evol.first_order().unwrap();
    assert_eq!(op.unitary.num_qubits(), 3);
}

#[test]
fn y_operator_is_unitary() {
    let h = Hamiltonian::from_terms(vec![HamiltonianTerm::new(
        0.5,
        PauliString::from_ops([(0, PauliOp::Y), (1, PauliOp::Y)]),
    )]);
    let op = TrotterEvolution::new(h, 1.0, 3).second_order().unwrap();
    assert!(op.unitary.is_unitary(DEFAULT_UNITARY_TOLERANCE));
}

#[test]
fn commuting_terms_are_exact() {
    // Z₀ and Z₀Z₁ commute, so one first-order slice is already exact.
    let h = Hamiltonian::from_terms(vec![
        HamiltonianTerm::zz(0, 1, 1.0),
        HamiltonianTerm::z(0, -0.5),
    ]);
    let op = TrotterEvolution::new(h.clone(), 0.8, 1).first_order().unwrap();
    assert!(exact_distance(&h, 0.8, &op) < 1e-10);
}

// ---------------------------------------------------------------------------
// Cost accounting
// ---------------------------------------------------------------------------

#[test]
fn first_order_cost_scales_with_steps() {
    // ZZ: 2 CX + Rz = 3; X: H + Rz + H = 3 each.
    let op1 = TrotterEvolution::new(ising(), 1.0, 1).first_order().unwrap();
    let op4 = TrotterEvolution::new(ising(), 1.0, 4).first_order().unwrap();
    assert_eq!(op1.cost, 9);
    assert_eq!(op4.cost, 36);
}

#[test]
fn suzuki_cost_grows_fivefold_per_order() {
    let evol = TrotterEvolution::new(ising(), 1.0, 2);
    let s1 = evol.suzuki(1).unwrap();
    let s2 = evol.suzuki(2).unwrap();
    assert_eq!(s1.cost, 2 * 18);
    assert_eq!(s2.cost, 5 * s1.cost);
    assert_eq!(evol.suzuki_slice_cost(2) * 2, s2.cost);
}

#[test]
fn cost_saturates_instead_of_overflowing() {
    let evol = TrotterEvolution::new(ising(), 1.0, usize::MAX);
    assert_eq!(evol.first_order().unwrap().cost, u64::MAX);
    assert_eq!(evol.suzuki_slice_cost(40), u64::MAX);
    assert!(evol.suzuki_slice_cost(27) <= evol.suzuki_slice_cost(28));
}

// ---------------------------------------------------------------------------
// Accuracy
// ---------------------------------------------------------------------------

#[test]
fn more_steps_reduce_error() {
    let coarse = TrotterEvolution::new(ising(), 1.0, 2).first_order().unwrap();
    let fine = TrotterEvolution::new(ising(), 1.0, 32).first_order().unwrap();
    assert!(exact_distance(&ising(), 1.0, &fine) < exact_distance(&ising(), 1.0, &coarse));
}

#[test]
fn second_order_beats_first_order() {
    let t = 1.0;
    let first = TrotterEvolution::new(ising(), t, 8).first_order().unwrap();
    let second = TrotterEvolution::new(ising(), t, 8).second_order().unwrap();
    assert!(exact_distance(&ising(), t, &second) < exact_distance(&ising(), t, &first));
}

#[test]
fn higher_suzuki_order_converges() {
    let t = 1.0;
    let s1 = TrotterEvolution::new(ising(), t, 4).suzuki(1).unwrap();
    let s2 = TrotterEvolution::new(ising(), t, 4).suzuki(2).unwrap();
    assert!(exact_distance(&ising(), t, &s2) < exact_distance(&ising(), t, &s1));
}

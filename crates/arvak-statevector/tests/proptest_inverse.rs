//! Property-based tests for circuit inversion.
//!
//! Running a circuit followed by its inverse must return any state to where
//! it started, and every operation must preserve the norm.

use arvak_statevector::{Circuit, Control, Operation, StandardGate, StateVector};
use num_complex::Complex64;
use proptest::prelude::*;

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    H(usize),
    X(usize),
    Ry(f64, usize),
    P(f64, usize),
    CP(f64, usize, usize),
    Swap(usize, usize),
    /// Ry on `target`, conditioned on `control` being |0⟩.
    ZeroControlledRy(f64, usize, usize),
}

impl GateOp {
    fn apply(&self, circuit: &mut Circuit) {
        match *self {
            GateOp::H(q) => {
                circuit.h(q).unwrap();
            }
            GateOp::X(q) => {
                circuit.x(q).unwrap();
            }
            GateOp::Ry(theta, q) => {
                circuit.ry(theta, q).unwrap();
            }
            GateOp::P(theta, q) => {
                circuit
                    .push(Operation::gate(StandardGate::P(theta), [q]))
                    .unwrap();
            }
            GateOp::CP(theta, c, t) => {
                circuit.cp(theta, c, t).unwrap();
            }
            GateOp::Swap(a, b) => {
                circuit.swap(a, b).unwrap();
            }
            GateOp::ZeroControlledRy(theta, c, t) => {
                circuit
                    .push(
                        Operation::gate(StandardGate::Ry(theta), [t])
                            .controlled_by([Control::off(c)]),
                    )
                    .unwrap();
            }
        }
    }
}

fn arb_angle() -> impl Strategy<Value = f64> {
    -std::f64::consts::PI..std::f64::consts::PI
}

/// Two distinct qubits below `num_qubits` (which must be at least 2).
fn arb_pair(num_qubits: usize) -> impl Strategy<Value = (usize, usize)> {
    (0..num_qubits, 1..num_qubits).prop_map(move |(a, offset)| (a, (a + offset) % num_qubits))
}

fn arb_gate_op(num_qubits: usize) -> impl Strategy<Value = GateOp> {
    prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits).prop_map(GateOp::X),
        (arb_angle(), 0..num_qubits).prop_map(|(t, q)| GateOp::Ry(t, q)),
        (arb_angle(), 0..num_qubits).prop_map(|(t, q)| GateOp::P(t, q)),
        (arb_angle(), arb_pair(num_qubits)).prop_map(|(t, (c, q))| GateOp::CP(t, c, q)),
        arb_pair(num_qubits).prop_map(|(a, b)| GateOp::Swap(a, b)),
        (arb_angle(), arb_pair(num_qubits))
            .prop_map(|(t, (c, q))| GateOp::ZeroControlledRy(t, c, q)),
    ]
}

/// Generate a random circuit on 2-4 qubits with 1-12 operations.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (2_usize..=4).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 1..=12).prop_map(move |ops| {
            let mut circuit = Circuit::new("random", num_qubits);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

/// A state prepared by a layer of Hadamards and Ry rotations, so the
/// starting point is not a basis state.
fn prepared_state(num_qubits: usize, angles: &[f64]) -> StateVector {
    let mut sv = StateVector::new(num_qubits, num_qubits).unwrap();
    for q in 0..num_qubits {
        sv.h(q).unwrap();
        sv.apply_gate(&StandardGate::Ry(angles[q % angles.len()]), &[q])
            .unwrap();
    }
    sv
}

fn distance(a: &[Complex64], b: &[Complex64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).norm_sqr())
        .sum::<f64>()
        .sqrt()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Circuit followed by its inverse is the identity on any state.
    #[test]
    fn inverse_restores_state(
        circuit in arb_circuit(),
        angles in prop::collection::vec(arb_angle(), 1..=4),
    ) {
        let n = circuit.num_qubits();
        let start = prepared_state(n, &angles);

        let mut sv = start.clone();
        sv.run(&circuit).unwrap();
        sv.run(&circuit.inverse()).unwrap();

        let d = distance(sv.amplitudes(), start.amplitudes());
        prop_assert!(d < 1e-9, "distance after inverse: {}", d);
    }

    /// Running a circuit keeps the state normalized.
    #[test]
    fn run_preserves_norm(
        circuit in arb_circuit(),
        angles in prop::collection::vec(arb_angle(), 1..=4),
    ) {
        let mut sv = prepared_state(circuit.num_qubits(), &angles);
        sv.run(&circuit).unwrap();
        prop_assert!((sv.norm_sqr() - 1.0).abs() < 1e-9);
    }

    /// The inverse has the same length and weighted size.
    #[test]
    fn inverse_preserves_counts(circuit in arb_circuit()) {
        let inverse = circuit.inverse();
        prop_assert_eq!(inverse.len(), circuit.len());
        prop_assert_eq!(inverse.num_ops(), circuit.num_ops());
        prop_assert_eq!(inverse.depth(), circuit.depth());
    }
}

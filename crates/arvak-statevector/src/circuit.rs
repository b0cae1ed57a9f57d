//! Invertible operation sequences.
//!
//! A [`Circuit`] is the composed-unitary abstraction the engine executes: an
//! ordered list of [`Operation`]s, each either a [`StandardGate`] or a dense
//! [`Unitary`] block, optionally conditioned on control qubits.
//!
//! Every operation carries a *weight*: the number of elementary operations it
//! stands for. A controlled `U^(2^j)` built from a product formula is applied
//! as a single dense block but is charged for every Pauli rotation it
//! represents. [`Circuit::num_ops`] and [`Circuit::depth`] are computed from
//! these weights.
//!
//! # Example
//!
//! ```rust
//! use arvak_statevector::{Circuit, StateVector};
//!
//! let mut circuit = Circuit::new("bell", 2);
//! circuit.h(0).unwrap();
//! circuit.cp(std::f64::consts::PI, 0, 1).unwrap();
//! circuit.h(1).unwrap();
//!
//! let mut sv = StateVector::new(2, 10).unwrap();
//! sv.run(&circuit).unwrap();
//! sv.run(&circuit.inverse()).unwrap();
//! assert!((sv.probability(0, false).unwrap() - 1.0).abs() < 1e-12);
//! ```

use std::sync::Arc;

use crate::error::{EngineError, EngineResult};
use crate::gate::StandardGate;
use crate::unitary::Unitary;

/// A control condition: the operation only acts where `qubit == value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Control {
    /// Control qubit.
    pub qubit: usize,
    /// Required value of the control qubit.
    pub value: bool,
}

impl Control {
    /// Condition on `qubit == 1`.
    pub fn on(qubit: usize) -> Self {
        Self { qubit, value: true }
    }

    /// Condition on `qubit == 0`.
    pub fn off(qubit: usize) -> Self {
        Self {
            qubit,
            value: false,
        }
    }
}

/// What an operation applies to its targets.
#[derive(Debug, Clone)]
pub enum OperationKind {
    /// A built-in gate.
    Gate(StandardGate),
    /// A dense block; shared so that inverses and clones stay cheap.
    Block(Arc<Unitary>),
}

/// A single (possibly controlled) operation.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Gate or block.
    pub kind: OperationKind,
    /// Target qubits; `targets[i]` is bit `i` of the block index.
    pub targets: Vec<usize>,
    /// Control conditions (all must hold).
    pub controls: Vec<Control>,
    /// Elementary operations this entry stands for (≥ 1).
    pub weight: u64,
    /// Optional label for logging.
    pub label: Option<String>,
}

impl Operation {
    /// A standard gate on `targets`.
    pub fn gate(gate: StandardGate, targets: impl Into<Vec<usize>>) -> Self {
        Self {
            kind: OperationKind::Gate(gate),
            targets: targets.into(),
            controls: Vec::new(),
            weight: 1,
            label: None,
        }
    }

    /// A dense block on `targets`.
    pub fn block(unitary: Arc<Unitary>, targets: impl Into<Vec<usize>>) -> Self {
        Self {
            kind: OperationKind::Block(unitary),
            targets: targets.into(),
            controls: Vec::new(),
            weight: 1,
            label: None,
        }
    }

    /// Add control conditions.
    #[must_use]
    pub fn controlled_by(mut self, controls: impl IntoIterator<Item = Control>) -> Self {
        self.controls.extend(controls);
        self
    }

    /// Set the elementary-operation weight (clamped to at least 1).
    #[must_use]
    pub fn with_weight(mut self, weight: u64) -> Self {
        self.weight = weight.max(1);
        self
    }

    /// Attach a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The inverse operation: same operands, daggered action.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let kind = match &self.kind {
            OperationKind::Gate(g) => OperationKind::Gate(g.inverse()),
            OperationKind::Block(u) => OperationKind::Block(Arc::new(u.dagger())),
        };
        Self {
            kind,
            targets: self.targets.clone(),
            controls: self.controls.clone(),
            weight: self.weight,
            label: self.label.as_ref().map(|l| format!("{l}†")),
        }
    }

    /// Number of target qubits expected by the gate or block.
    pub fn arity(&self) -> usize {
        match &self.kind {
            OperationKind::Gate(g) => g.num_qubits(),
            OperationKind::Block(u) => u.num_qubits(),
        }
    }

    /// All qubits the operation touches (targets then controls).
    pub fn qubits(&self) -> impl Iterator<Item = usize> + '_ {
        self.targets
            .iter()
            .copied()
            .chain(self.controls.iter().map(|c| c.qubit))
    }

    /// Check the operand list against a register of `num_qubits` qubits.
    pub fn validate(&self, num_qubits: usize) -> EngineResult<()> {
        if self.targets.len() != self.arity() {
            return Err(EngineError::DimensionMismatch(format!(
                "operation expects {} target qubits, got {}",
                self.arity(),
                self.targets.len()
            )));
        }
        let mut seen = Vec::with_capacity(self.targets.len() + self.controls.len());
        for q in self.qubits() {
            if q >= num_qubits {
                return Err(EngineError::DimensionMismatch(format!(
                    "qubit {q} is outside a register of {num_qubits} qubits"
                )));
            }
            if seen.contains(&q) {
                return Err(EngineError::DimensionMismatch(format!(
                    "qubit {q} appears more than once in one operation"
                )));
            }
            seen.push(q);
        }
        Ok(())
    }
}

/// An ordered, invertible sequence of operations on a fixed-width register.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    num_qubits: usize,
    ops: Vec<Operation>,
}

impl Circuit {
    /// Create an empty circuit on `num_qubits` qubits.
    pub fn new(name: impl Into<String>, num_qubits: usize) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            ops: Vec::new(),
        }
    }

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The operations in application order.
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    /// Number of entries (not weighted).
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if the circuit has no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Append a validated operation.
    pub fn push(&mut self, op: Operation) -> EngineResult<&mut Self> {
        op.validate(self.num_qubits)?;
        self.ops.push(op);
        Ok(self)
    }

    /// Append every operation of `other`.
    pub fn append(&mut self, other: &Circuit) -> EngineResult<&mut Self> {
        if other.num_qubits > self.num_qubits {
            return Err(EngineError::DimensionMismatch(format!(
                "cannot append a {}-qubit circuit to a {}-qubit circuit",
                other.num_qubits, self.num_qubits
            )));
        }
        self.ops.extend(other.ops.iter().cloned());
        Ok(self)
    }

    /// Apply a Hadamard gate.
    pub fn h(&mut self, qubit: usize) -> EngineResult<&mut Self> {
        self.push(Operation::gate(StandardGate::H, [qubit]))
    }

    /// Apply a Pauli-X gate.
    pub fn x(&mut self, qubit: usize) -> EngineResult<&mut Self> {
        self.push(Operation::gate(StandardGate::X, [qubit]))
    }

    /// Apply an Ry rotation.
    pub fn ry(&mut self, theta: f64, qubit: usize) -> EngineResult<&mut Self> {
        self.push(Operation::gate(StandardGate::Ry(theta), [qubit]))
    }

    /// Apply a controlled phase.
    pub fn cp(&mut self, theta: f64, control: usize, target: usize) -> EngineResult<&mut Self> {
        self.push(Operation::gate(StandardGate::CP(theta), [control, target]))
    }

    /// Apply a swap.
    pub fn swap(&mut self, q1: usize, q2: usize) -> EngineResult<&mut Self> {
        self.push(Operation::gate(StandardGate::Swap, [q1, q2]))
    }

    /// The inverse circuit: operations reversed and individually inverted.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            name: format!("{}_dg", self.name),
            num_qubits: self.num_qubits,
            ops: self.ops.iter().rev().map(Operation::inverse).collect(),
        }
    }

    /// Total elementary operation count (sum of weights, saturating at
    /// `u64::MAX`).
    pub fn num_ops(&self) -> u64 {
        self.ops
            .iter()
            .map(|op| op.weight)
            .fold(0, u64::saturating_add)
    }

    /// Length of the longest dependency chain.
    ///
    /// Operations sharing a qubit are ordered; an operation of weight `w`
    /// occupies all of its qubits for `w` consecutive layers.
    pub fn depth(&self) -> u64 {
        let mut layers = vec![0u64; self.num_qubits];
        let mut max_depth = 0u64;
        for op in &self.ops {
            let start = op.qubits().map(|q| layers[q]).max().unwrap_or(0);
            let end = start.saturating_add(op.weight);
            for q in op.qubits() {
                layers[q] = end;
            }
            max_depth = max_depth.max(end);
        }
        max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_push_rejects_out_of_range() {
        let mut c = Circuit::new("t", 2);
        assert!(matches!(c.h(2), Err(EngineError::DimensionMismatch(_))));
        assert!(matches!(
            c.cp(PI, 1, 1),
            Err(EngineError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_depth_parallel_and_serial() {
        let mut c = Circuit::new("t", 3);
        c.h(0).unwrap().h(1).unwrap().h(2).unwrap();
        assert_eq!(c.depth(), 1);
        c.cp(PI / 2.0, 0, 1).unwrap();
        c.cp(PI / 4.0, 1, 2).unwrap();
        assert_eq!(c.depth(), 3);
        assert_eq!(c.num_ops(), 5);
    }

    #[test]
    fn test_weight_counts_into_depth() {
        let mut c = Circuit::new("t", 2);
        c.push(
            Operation::gate(StandardGate::Ry(0.1), [0])
                .controlled_by([Control::on(1)])
                .with_weight(7),
        )
        .unwrap();
        c.h(0).unwrap();
        assert_eq!(c.num_ops(), 8);
        assert_eq!(c.depth(), 8);
    }

    #[test]
    fn test_weights_saturate() {
        let mut c = Circuit::new("t", 2);
        for _ in 0..2 {
            c.push(Operation::gate(StandardGate::H, [0]).with_weight(u64::MAX)).unwrap();
        }
        c.h(1).unwrap();
        assert_eq!(c.num_ops(), u64::MAX);
        assert_eq!(c.depth(), u64::MAX);
    }

    #[test]
    fn test_inverse_reverses_order() {
        let mut c = Circuit::new("t", 2);
        c.h(0).unwrap().ry(0.5, 1).unwrap();
        let inv = c.inverse();
        assert_eq!(inv.len(), 2);
        assert!(matches!(
            inv.ops()[0].kind,
            OperationKind::Gate(StandardGate::Ry(t)) if (t + 0.5).abs() < 1e-15
        ));
        assert_eq!(inv.name(), "t_dg");
    }
}

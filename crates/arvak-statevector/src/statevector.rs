//! Statevector simulation engine.

use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;
use tracing::trace;

use crate::circuit::{Circuit, Control, Operation, OperationKind};
use crate::error::{EngineError, EngineResult};
use crate::gate::StandardGate;
use crate::unitary::Unitary;

/// Tolerance applied to unit-norm checks on caller-supplied amplitudes.
const NORM_TOLERANCE: f64 = 1e-9;

/// A statevector representing a quantum state.
///
/// Qubit `q` corresponds to bit `q` of the basis index.
#[derive(Debug, Clone)]
pub struct StateVector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl StateVector {
    /// Create a new statevector initialized to |0...0⟩.
    ///
    /// Fails with [`EngineError::RegisterTooLarge`] before allocating when
    /// `num_qubits` exceeds `max_qubits`.
    pub fn new(num_qubits: usize, max_qubits: usize) -> EngineResult<Self> {
        if num_qubits > max_qubits || num_qubits >= usize::BITS as usize {
            return Err(EngineError::RegisterTooLarge {
                requested: num_qubits,
                max: max_qubits,
            });
        }
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Wrap an existing unit-norm amplitude vector.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> EngineResult<Self> {
        let len = amplitudes.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(EngineError::DimensionMismatch(format!(
                "amplitude vector length {len} is not a power of two"
            )));
        }
        check_normalized(&amplitudes)?;
        Ok(Self {
            num_qubits: len.trailing_zeros() as usize,
            amplitudes,
        })
    }

    /// Replace the state with `Σ_i amplitudes[i] |i⟩` on `qubits`, all other
    /// qubits in |0⟩.
    pub fn initialize(&mut self, qubits: &[usize], amplitudes: &[Complex64]) -> EngineResult<()> {
        self.check_distinct(qubits)?;
        if amplitudes.len() != 1usize << qubits.len() {
            return Err(EngineError::DimensionMismatch(format!(
                "{} amplitudes cannot be encoded on {} qubits",
                amplitudes.len(),
                qubits.len()
            )));
        }
        check_normalized(amplitudes)?;
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        for (r, amp) in amplitudes.iter().enumerate() {
            self.amplitudes[scatter(r, qubits)] = *amp;
        }
        Ok(())
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// All amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Σ |a_i|².
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Probability of reading `outcome` on `qubit`, without collapsing.
    pub fn probability(&self, qubit: usize, outcome: bool) -> EngineResult<f64> {
        self.check_qubit(qubit)?;
        let mask = 1usize << qubit;
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| (i & mask != 0) == outcome)
            .map(|(_, a)| a.norm_sqr())
            .sum())
    }

    /// Project onto `qubit == outcome` and renormalize.
    ///
    /// Returns the probability mass of the outcome before renormalization.
    /// A zero-mass outcome leaves the state untouched and returns 0.
    pub fn measure(&mut self, qubit: usize, outcome: bool) -> EngineResult<f64> {
        let probability = self.probability(qubit, outcome)?;
        if probability <= f64::MIN_POSITIVE {
            trace!(qubit, outcome, "postselection on an empty subspace");
            return Ok(0.0);
        }
        let mask = 1usize << qubit;
        let scale = 1.0 / probability.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                *amp *= scale;
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        Ok(probability)
    }

    /// Amplitudes of `register` with every other qubit fixed by `fixed`.
    ///
    /// Every qubit must appear exactly once in either `register` or `fixed`.
    /// Entry `r` of the result has bit `i` of `r` on `register[i]`.
    pub fn conditional_amplitudes(
        &self,
        register: &[usize],
        fixed: &[Control],
    ) -> EngineResult<Vec<Complex64>> {
        let all: Vec<usize> = register
            .iter()
            .copied()
            .chain(fixed.iter().map(|c| c.qubit))
            .collect();
        self.check_distinct(&all)?;
        if all.len() != self.num_qubits {
            return Err(EngineError::DimensionMismatch(format!(
                "{} of {} qubits are neither read nor fixed",
                self.num_qubits - all.len(),
                self.num_qubits
            )));
        }
        let base = fixed
            .iter()
            .filter(|c| c.value)
            .fold(0usize, |acc, c| acc | (1 << c.qubit));
        Ok((0..1usize << register.len())
            .map(|r| self.amplitudes[base | scatter(r, register)])
            .collect())
    }

    /// Apply `unitary` to `targets`.
    pub fn apply(&mut self, unitary: &Unitary, targets: &[usize]) -> EngineResult<()> {
        self.apply_controlled(unitary, &[], targets)
    }

    /// Apply `unitary` to `targets` on the basis states where every control
    /// condition holds.
    ///
    /// The block is tensor-expanded over all untouched qubits: for every
    /// assignment of the remaining qubits, the `2^k` amplitudes addressed by
    /// the targets are multiplied by the block.
    pub fn apply_controlled(
        &mut self,
        unitary: &Unitary,
        controls: &[Control],
        targets: &[usize],
    ) -> EngineResult<()> {
        if unitary.num_qubits() != targets.len() {
            return Err(EngineError::DimensionMismatch(format!(
                "{}-qubit block applied to {} target qubits",
                unitary.num_qubits(),
                targets.len()
            )));
        }
        let touched: Vec<usize> = targets
            .iter()
            .copied()
            .chain(controls.iter().map(|c| c.qubit))
            .collect();
        self.check_distinct(&touched)?;

        let dim = unitary.dim();
        let matrix = unitary.matrix();
        let target_mask = targets.iter().fold(0usize, |acc, &q| acc | (1 << q));
        let ctrl_mask = controls.iter().fold(0usize, |acc, c| acc | (1 << c.qubit));
        let ctrl_value = controls
            .iter()
            .filter(|c| c.value)
            .fold(0usize, |acc, c| acc | (1 << c.qubit));
        let offsets: Vec<usize> = (0..dim).map(|r| scatter(r, targets)).collect();
        let mut buffer = vec![Complex64::new(0.0, 0.0); dim];

        for base in 0..self.amplitudes.len() {
            if base & target_mask != 0 || base & ctrl_mask != ctrl_value {
                continue;
            }
            for (slot, offset) in buffer.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | offset];
            }
            for (row, offset) in offsets.iter().enumerate() {
                let mut acc = Complex64::new(0.0, 0.0);
                for (col, value) in buffer.iter().enumerate() {
                    acc += matrix[(row, col)] * value;
                }
                self.amplitudes[base | offset] = acc;
            }
        }
        Ok(())
    }

    /// Apply a standard gate to specific qubits.
    pub fn apply_gate(&mut self, gate: &StandardGate, qubits: &[usize]) -> EngineResult<()> {
        if qubits.len() != gate.num_qubits() {
            return Err(EngineError::DimensionMismatch(format!(
                "gate {gate} expects {} qubits, got {}",
                gate.num_qubits(),
                qubits.len()
            )));
        }
        self.check_distinct(qubits)?;
        match *gate {
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Ry(theta) => self.apply_ry(qubits[0], theta),
            StandardGate::P(theta) => self.apply_phase(qubits[0], theta),
            StandardGate::CP(theta) => self.apply_cp(qubits[0], qubits[1], theta),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
        }
        Ok(())
    }

    /// Apply a single operation.
    pub fn apply_operation(&mut self, op: &Operation) -> EngineResult<()> {
        op.validate(self.num_qubits)?;
        match &op.kind {
            OperationKind::Gate(gate) if op.controls.is_empty() => {
                self.apply_gate(gate, &op.targets)
            }
            OperationKind::Gate(gate) => {
                self.apply_controlled(&gate.unitary(), &op.controls, &op.targets)
            }
            OperationKind::Block(unitary) => {
                self.apply_controlled(unitary, &op.controls, &op.targets)
            }
        }
    }

    /// Apply every operation of `circuit` in order.
    pub fn run(&mut self, circuit: &Circuit) -> EngineResult<()> {
        if circuit.num_qubits() > self.num_qubits {
            return Err(EngineError::DimensionMismatch(format!(
                "circuit '{}' needs {} qubits, register has {}",
                circuit.name(),
                circuit.num_qubits(),
                self.num_qubits
            )));
        }
        trace!(circuit = circuit.name(), ops = circuit.len(), "running circuit");
        for op in circuit.ops() {
            self.apply_operation(op)?;
        }
        Ok(())
    }

    /// Apply a Hadamard gate.
    pub fn h(&mut self, qubit: usize) -> EngineResult<()> {
        self.apply_gate(&StandardGate::H, &[qubit])
    }

    /// Apply a Pauli-X gate.
    pub fn x(&mut self, qubit: usize) -> EngineResult<()> {
        self.apply_gate(&StandardGate::X, &[qubit])
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = FRAC_1_SQRT_2 * (a + b);
                self.amplitudes[j] = FRAC_1_SQRT_2 * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cp(&mut self, control: usize, target: usize, theta: f64) {
        let both = (1 << control) | (1 << target);
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & both == both {
                *amp *= phase;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & mask1 != 0 && i & mask2 == 0 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    // =========================================================================
    // Operand checks
    // =========================================================================

    fn check_qubit(&self, qubit: usize) -> EngineResult<()> {
        if qubit >= self.num_qubits {
            return Err(EngineError::DimensionMismatch(format!(
                "qubit {qubit} is outside a register of {} qubits",
                self.num_qubits
            )));
        }
        Ok(())
    }

    fn check_distinct(&self, qubits: &[usize]) -> EngineResult<()> {
        for (i, &q) in qubits.iter().enumerate() {
            self.check_qubit(q)?;
            if qubits[..i].contains(&q) {
                return Err(EngineError::DimensionMismatch(format!(
                    "qubit {q} appears more than once"
                )));
            }
        }
        Ok(())
    }
}

/// Spread the bits of `r` onto the positions listed in `qubits`.
fn scatter(r: usize, qubits: &[usize]) -> usize {
    qubits
        .iter()
        .enumerate()
        .fold(0, |acc, (bit, &q)| acc | (((r >> bit) & 1) << q))
}

fn check_normalized(amplitudes: &[Complex64]) -> EngineResult<()> {
    let norm: f64 = amplitudes.iter().map(Complex64::norm_sqr).sum();
    if (norm - 1.0).abs() > NORM_TOLERANCE {
        return Err(EngineError::NotNormalized(norm));
    }
    Ok(())
}

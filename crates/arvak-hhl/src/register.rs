//! Register layout and eigenvalue encoding.
//!
//! Qubit `q` is bit `q` of the basis index. The main register occupies
//! qubits `0..n`, the eigenvalue register `n..n+k`, and the ancilla `n+k`.
//!
//! The eigenvalue register holds a fixed-point fraction `m / 2^k` of a full
//! turn. With negative eigenvalues enabled the top bit is a sign bit and the
//! register is two's complement; before the reciprocal rotation it is
//! converted to sign-magnitude form so that every rotation only has to read
//! a magnitude and a sign.

use std::f64::consts::TAU;
use std::ops::Range;
use std::sync::Arc;

use arvak_statevector::{Circuit, Control, Operation, Unitary};

use crate::error::SolveResult;

/// Positions of the three registers inside the full state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterLayout {
    num_main: usize,
    num_eigen: usize,
}

impl RegisterLayout {
    /// Layout for an `num_main`-qubit system and a `num_eigen`-bit estimate.
    pub fn new(num_main: usize, num_eigen: usize) -> Self {
        Self {
            num_main,
            num_eigen,
        }
    }

    /// Main-register qubits.
    pub fn main_qubits(&self) -> Range<usize> {
        0..self.num_main
    }

    /// Eigenvalue-register qubits, least significant first.
    pub fn eigen_qubits(&self) -> Range<usize> {
        self.num_main..self.num_main + self.num_eigen
    }

    /// The rotation ancilla.
    pub fn ancilla(&self) -> usize {
        self.num_main + self.num_eigen
    }

    /// Total register width.
    pub fn total_qubits(&self) -> usize {
        self.num_main + self.num_eigen + 1
    }
}

/// The eigenvalue register and its fixed-point encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EigenvalueRegister {
    qubits: Vec<usize>,
    signed: bool,
}

impl EigenvalueRegister {
    /// Register over `qubits` (least significant first).
    pub fn new(qubits: impl IntoIterator<Item = usize>, signed: bool) -> Self {
        Self {
            qubits: qubits.into_iter().collect(),
            signed,
        }
    }

    /// Qubits, least significant first.
    pub fn qubits(&self) -> &[usize] {
        &self.qubits
    }

    /// Register width k.
    pub fn num_bits(&self) -> usize {
        self.qubits.len()
    }

    /// Whether the top bit is a sign bit.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Qubits carrying the magnitude.
    pub fn magnitude_qubits(&self) -> &[usize] {
        if self.signed {
            &self.qubits[..self.qubits.len() - 1]
        } else {
            &self.qubits
        }
    }

    /// The sign qubit, when the register is signed.
    pub fn sign_qubit(&self) -> Option<usize> {
        self.signed.then(|| self.qubits[self.qubits.len() - 1])
    }

    /// `2^k`.
    pub fn resolution(&self) -> f64 {
        (self.num_bits() as f64).exp2()
    }

    /// Signed bin index of a raw register value (two's complement when signed).
    pub fn decode_bin(&self, raw: usize) -> i64 {
        let k = self.num_bits();
        let raw = (raw & ((1usize << k) - 1)) as i64;
        if self.signed && raw >= 1 << (k - 1) {
            raw - (1 << k)
        } else {
            raw
        }
    }

    /// Register fraction `bin / 2^k` for a raw register value.
    pub fn decode(&self, raw: usize) -> f64 {
        self.decode_bin(raw) as f64 / self.resolution()
    }

    /// Register fraction for a sign-magnitude pair, after conversion.
    ///
    /// A set sign with stored magnitude 0 stands for the most negative bin.
    pub fn decode_sign_magnitude(&self, negative: bool, magnitude: usize) -> f64 {
        if !negative {
            return magnitude as f64 / self.resolution();
        }
        let half = 1usize << (self.num_bits() - 1);
        let magnitude = if magnitude == 0 { half } else { magnitude };
        -(magnitude as f64) / self.resolution()
    }

    /// The bin an eigenvalue lands in for evolution time `t`, before
    /// wrap-around.
    pub fn nearest_bin(&self, eigenvalue: f64, t: f64) -> i64 {
        (eigenvalue * t / TAU * self.resolution()).round() as i64
    }

    /// Whether `bin` can be represented without aliasing.
    pub fn holds_bin(&self, bin: i64) -> bool {
        let k = self.num_bits() as u32;
        if self.signed {
            let half = 1i64 << (k - 1);
            (-half..half).contains(&bin)
        } else {
            (0..1i64 << k).contains(&bin)
        }
    }

    /// Eigenvalue represented by `bin` at evolution time `t`.
    pub fn bin_to_eigenvalue(&self, bin: i64, t: f64) -> f64 {
        bin as f64 / self.resolution() * TAU / t
    }

    /// Two's complement → sign-magnitude conversion, `None` when unsigned.
    ///
    /// Conditioned on the sign bit, the magnitude bits `r` map to
    /// `(2^(k-1) - r) mod 2^(k-1)`. The map is an involution, so the inverse
    /// circuit undoes it.
    pub fn sign_magnitude_circuit(&self, total_qubits: usize) -> SolveResult<Option<Circuit>> {
        let Some(sign) = self.sign_qubit() else {
            return Ok(None);
        };
        let half = 1usize << (self.num_bits() - 1);
        let permutation: Vec<usize> = (0..half).map(|r| (half - r) % half).collect();
        let block = Unitary::permutation(&permutation)?;

        let mut circuit = Circuit::new("sign_magnitude", total_qubits);
        circuit.push(
            Operation::block(Arc::new(block), self.magnitude_qubits().to_vec())
                .controlled_by([Control::on(sign)])
                .with_weight(self.magnitude_qubits().len() as u64)
                .with_label("negate"),
        )?;
        Ok(Some(circuit))
    }
}

/// Fraction of the representable magnitude range the spectral radius maps to.
pub const SPECTRUM_FILL: f64 = 0.75;

/// Evolution time that maps the spectral radius to [`SPECTRUM_FILL`] of the
/// register's magnitude range.
///
/// `0.75 · 2π / λ_max`, or `0.375 · 2π / λ_max` when the top bit is a sign
/// bit. The time does not depend on the register width: a wider register
/// resolves the same eigenphases to more bits instead of moving them, and
/// eigenvalues in dyadic ratio to `λ_max` land on exact bins once the
/// register is wide enough. A zero spectral radius falls back to `λ_max = 1`.
pub fn evolution_time(lambda_max: f64, negative_evals: bool) -> f64 {
    let lambda_max = if lambda_max > f64::EPSILON {
        lambda_max
    } else {
        1.0
    };
    let range = if negative_evals { 0.5 } else { 1.0 };
    SPECTRUM_FILL * range * TAU / lambda_max
}

#[cfg(test)]
mod tests {
    use super::*;
    use arvak_statevector::StateVector;

    #[test]
    fn test_layout() {
        let layout = RegisterLayout::new(2, 3);
        assert_eq!(layout.main_qubits(), 0..2);
        assert_eq!(layout.eigen_qubits(), 2..5);
        assert_eq!(layout.ancilla(), 5);
        assert_eq!(layout.total_qubits(), 6);
    }

    #[test]
    fn test_twos_complement_decode() {
        let reg = EigenvalueRegister::new(0..3, true);
        assert_eq!(reg.decode_bin(0b011), 3);
        assert_eq!(reg.decode_bin(0b100), -4);
        assert_eq!(reg.decode_bin(0b111), -1);
        let unsigned = EigenvalueRegister::new(0..3, false);
        assert_eq!(unsigned.decode_bin(0b111), 7);
    }

    #[test]
    fn test_evolution_time_fills_register() {
        let t = evolution_time(2.0, false);
        let reg = EigenvalueRegister::new(0..3, false);
        assert_eq!(reg.nearest_bin(2.0, t), 6);
        assert_eq!(reg.nearest_bin(1.0, t), 3);

        let t = evolution_time(4.0, true);
        let reg = EigenvalueRegister::new(0..3, true);
        assert_eq!(reg.nearest_bin(-4.0, t), -3);
        assert!(reg.holds_bin(-3));
    }

    #[test]
    fn test_zero_spectrum_falls_back() {
        assert!((evolution_time(0.0, false) - 0.75 * TAU).abs() < 1e-12);
    }

    #[test]
    fn test_evolution_time_independent_of_width() {
        // The same eigenvalue doubles its bin index with every added qubit.
        let t = evolution_time(2.0, false);
        let bins: Vec<i64> = (3..=8)
            .map(|k| EigenvalueRegister::new(0..k, false).nearest_bin(1.0, t))
            .collect();
        assert_eq!(bins, vec![3, 6, 12, 24, 48, 96]);
    }

    #[test]
    fn test_sign_magnitude_conversion() {
        // k = 3 over qubits 0..3; sign is qubit 2.
        let reg = EigenvalueRegister::new(0..3, true);
        let circuit = reg.sign_magnitude_circuit(3).unwrap().unwrap();
        for raw in 0..8usize {
            let mut sv = StateVector::new(3, 8).unwrap();
            for q in 0..3 {
                if raw >> q & 1 == 1 {
                    sv.x(q).unwrap();
                }
            }
            sv.run(&circuit).unwrap();
            let out = sv
                .amplitudes()
                .iter()
                .position(|a| a.norm() > 0.5)
                .unwrap();
            let negative = out & 0b100 != 0;
            let value = reg.decode_sign_magnitude(negative, out & 0b011);
            assert!((value - reg.decode(raw)).abs() < 1e-12, "raw {raw:03b}");
        }
    }

    #[test]
    fn test_unsigned_has_no_conversion() {
        let reg = EigenvalueRegister::new(0..3, false);
        assert!(reg.sign_magnitude_circuit(3).unwrap().is_none());
        assert_eq!(reg.sign_qubit(), None);
    }
}

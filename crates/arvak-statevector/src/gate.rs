//! Standard gates with in-place kernels.

use nalgebra::DMatrix;
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

use crate::unitary::Unitary;

/// Built-in gates understood by the engine.
///
/// Anything outside this set is expressed as a dense [`Unitary`] block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StandardGate {
    /// Hadamard.
    H,
    /// Pauli-X.
    X,
    /// Y-rotation `Ry(θ) = exp(-i θ Y / 2)`.
    Ry(f64),
    /// Phase gate `diag(1, e^{iθ})`.
    P(f64),
    /// Controlled phase, symmetric in its two qubits.
    CP(f64),
    /// Swap.
    Swap,
}

impl StandardGate {
    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            Self::H | Self::X | Self::Ry(_) | Self::P(_) => 1,
            Self::CP(_) | Self::Swap => 2,
        }
    }

    /// The inverse gate (U†).
    ///
    /// - H† = H, X† = X, Swap† = Swap
    /// - Ry(θ)† = Ry(-θ), P(θ)† = P(-θ), CP(θ)† = CP(-θ)
    #[must_use]
    pub fn inverse(&self) -> Self {
        match *self {
            Self::H => Self::H,
            Self::X => Self::X,
            Self::Swap => Self::Swap,
            Self::Ry(theta) => Self::Ry(-theta),
            Self::P(theta) => Self::P(-theta),
            Self::CP(theta) => Self::CP(-theta),
        }
    }

    /// Dense matrix of the gate, used when the gate carries extra controls.
    pub fn unitary(&self) -> Unitary {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let matrix = match *self {
            Self::H => {
                let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
                DMatrix::from_row_slice(2, 2, &[s, s, s, -s])
            }
            Self::X => DMatrix::from_row_slice(2, 2, &[zero, one, one, zero]),
            Self::Ry(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new((theta / 2.0).sin(), 0.0);
                DMatrix::from_row_slice(2, 2, &[c, -s, s, c])
            }
            Self::P(theta) => {
                DMatrix::from_row_slice(2, 2, &[one, zero, zero, Complex64::from_polar(1.0, theta)])
            }
            Self::CP(theta) => {
                let mut m = DMatrix::<Complex64>::identity(4, 4);
                m[(3, 3)] = Complex64::from_polar(1.0, theta);
                m
            }
            Self::Swap => {
                let mut m = DMatrix::<Complex64>::zeros(4, 4);
                m[(0, 0)] = one;
                m[(1, 2)] = one;
                m[(2, 1)] = one;
                m[(3, 3)] = one;
                m
            }
        };
        Unitary::new(matrix).expect("standard gate matrices are 2x2 or 4x4")
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::H => write!(f, "h"),
            Self::X => write!(f, "x"),
            Self::Ry(theta) => write!(f, "ry({theta})"),
            Self::P(theta) => write!(f, "p({theta})"),
            Self::CP(theta) => write!(f, "cp({theta})"),
            Self::Swap => write!(f, "swap"),
        }
    }
}

//! Run metrics and solution-quality helpers.

use nalgebra::DVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use arvak_statevector::Circuit;

/// Whether the eigenvalue register can tell A's eigenvalues apart.
///
/// Advisory only: a run with insufficient precision still completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Precision {
    /// Every eigenvalue has a bin of its own.
    Resolved,
    /// Some eigenvalues are merged, zeroed, or out of range.
    Insufficient {
        /// Human-readable description of every problem found.
        reason: String,
    },
}

impl Precision {
    /// True for [`Precision::Resolved`].
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

/// Operation count and dependency depth of one stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    /// Elementary operations.
    pub operations: u64,
    /// Longest dependency chain.
    pub depth: u64,
}

impl Cost {
    /// Cost of a circuit.
    pub fn of(circuit: &Circuit) -> Self {
        Self {
            operations: circuit.num_ops(),
            depth: circuit.depth(),
        }
    }
}

/// Per-stage resource breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCost {
    /// Phase estimation.
    pub estimate: Cost,
    /// Reciprocal rotation (including sign conversion).
    pub rotate: Cost,
    /// Inverse phase estimation.
    pub uncompute: Cost,
}

/// Metrics recomputed for every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Elementary operations: encode + stages + measurement.
    pub operation_count: u64,
    /// Dependency depth over the same operations.
    pub depth: u64,
    /// Probability mass of the ancilla reading 1.
    pub success_probability: f64,
    /// Per-stage breakdown.
    pub stages: StageCost,
}

/// Squared overlap `|⟨a|b⟩|² / (‖a‖²·‖b‖²)`; 0 when either vector is zero.
pub fn fidelity(a: &DVector<Complex64>, b: &DVector<Complex64>) -> f64 {
    let norms = a.norm_squared() * b.norm_squared();
    if norms <= f64::MIN_POSITIVE {
        return 0.0;
    }
    a.dotc(b).norm_sqr() / norms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(values: &[f64]) -> DVector<Complex64> {
        DVector::from_iterator(values.len(), values.iter().map(|&v| Complex64::new(v, 0.0)))
    }

    #[test]
    fn test_fidelity_ignores_scale_and_phase() {
        let a = vector(&[1.0, 2.0]);
        let b = vector(&[2.0, 4.0]) * Complex64::new(0.0, 1.0);
        assert!((fidelity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fidelity_orthogonal_and_zero() {
        assert!(fidelity(&vector(&[1.0, 0.0]), &vector(&[0.0, 1.0])).abs() < 1e-15);
        assert_eq!(fidelity(&vector(&[0.0, 0.0]), &vector(&[1.0, 0.0])), 0.0);
    }

    #[test]
    fn test_precision_serializes_tagged() {
        let json = serde_json::to_string(&Precision::Resolved).unwrap();
        assert_eq!(json, r#"{"status":"resolved"}"#);
    }
}

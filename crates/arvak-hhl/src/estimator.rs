//! Eigenvalue estimation (phase estimation over `exp(-iAt)`).

use std::sync::Arc;

use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::debug;

use arvak_sim::{Evolution, ExactEvolution, Hamiltonian, TrotterEvolution};
use arvak_statevector::{Circuit, Control, Operation, Unitary};

use crate::config::Expansion;
use crate::error::SolveResult;
use crate::metrics::Precision;
use crate::qft::qft;
use crate::register::{EigenvalueRegister, RegisterLayout};

/// Build `exp(-iAt)` on the main register.
pub fn build_evolution(
    matrix: &DMatrix<Complex64>,
    t: f64,
    expansion: Expansion,
    tolerance: f64,
) -> SolveResult<Evolution> {
    let evolution = match expansion {
        Expansion::Exact => ExactEvolution::new(matrix, t, tolerance)?.build()?,
        Expansion::Trotter { slices } | Expansion::Suzuki { slices, .. } => {
            let hamiltonian = Hamiltonian::from_hermitian(matrix, tolerance)?;
            if hamiltonian.n_terms() == 0 {
                Evolution {
                    unitary: Unitary::identity(hamiltonian.n_qubits() as usize),
                    cost: 1,
                }
            } else {
                let builder = TrotterEvolution::new(hamiltonian, t, slices);
                match expansion {
                    Expansion::Suzuki { order, .. } => builder.suzuki(order)?,
                    _ => builder.first_order()?,
                }
            }
        }
    };
    debug!(
        ?expansion,
        t,
        cost = evolution.cost,
        "built evolution operator"
    );
    Ok(evolution)
}

/// Phase estimation of A's eigenvalues into the eigenvalue register.
#[derive(Debug, Clone)]
pub struct EigenvalueEstimator {
    layout: RegisterLayout,
    register: EigenvalueRegister,
    evolution: Evolution,
    evolution_time: f64,
}

impl EigenvalueEstimator {
    /// Estimator for `matrix` evolved for time `t`.
    pub fn new(
        matrix: &DMatrix<Complex64>,
        t: f64,
        expansion: Expansion,
        tolerance: f64,
        layout: RegisterLayout,
        negative_evals: bool,
    ) -> SolveResult<Self> {
        let evolution = build_evolution(matrix, t, expansion, tolerance)?;
        Ok(Self {
            layout,
            register: EigenvalueRegister::new(layout.eigen_qubits(), negative_evals),
            evolution,
            evolution_time: t,
        })
    }

    /// The eigenvalue register.
    pub fn register(&self) -> &EigenvalueRegister {
        &self.register
    }

    /// Evolution time t.
    pub fn evolution_time(&self) -> f64 {
        self.evolution_time
    }

    /// The single-application evolution operator and its cost.
    pub fn evolution(&self) -> &Evolution {
        &self.evolution
    }

    /// Hadamards, controlled `U^(2^j)` and the forward QFT.
    ///
    /// `U = exp(-iAt)` has eigenphase `-λt/2π`, so the forward transform
    /// (rather than the inverse) leaves `m ≈ 2^k·λt/2π` in the register.
    pub fn circuit(&self) -> SolveResult<Circuit> {
        let total = self.layout.total_qubits();
        let main: Vec<usize> = self.layout.main_qubits().collect();
        let eigen = self.register.qubits();
        let mut circuit = Circuit::new("estimate", total);

        for &q in eigen {
            circuit.h(q)?;
        }
        let mut power = self.evolution.unitary.clone();
        for (j, &q) in eigen.iter().enumerate() {
            if j > 0 {
                power = power.squared();
            }
            let repetitions = 1u64 << j;
            circuit.push(
                Operation::block(Arc::new(power.clone()), main.clone())
                    .controlled_by([Control::on(q)])
                    .with_weight(repetitions.saturating_mul(self.evolution.cost))
                    .with_label(format!("U^{repetitions}")),
            )?;
        }
        circuit.append(&qft(eigen, total)?)?;

        debug!(
            eigen_qubits = eigen.len(),
            ops = circuit.num_ops(),
            depth = circuit.depth(),
            "built phase-estimation circuit"
        );
        Ok(circuit)
    }

    /// Compare the exact spectrum against the register's bins.
    ///
    /// Returns the advisory signal and the eigenvalue each exact eigenvalue
    /// is estimated as.
    pub fn assess_precision(&self, eigenvalues: &[f64]) -> (Precision, Vec<f64>) {
        assess_precision(&self.register, eigenvalues, self.evolution_time)
    }
}

/// Eigenvalues closer than this are treated as one.
const DISTINCT_EIGENVALUE_GAP: f64 = 1e-9;

/// See [`EigenvalueEstimator::assess_precision`].
pub fn assess_precision(
    register: &EigenvalueRegister,
    eigenvalues: &[f64],
    t: f64,
) -> (Precision, Vec<f64>) {
    let bins: Vec<i64> = eigenvalues
        .iter()
        .map(|&lambda| register.nearest_bin(lambda, t))
        .collect();
    let estimates = bins
        .iter()
        .map(|&bin| register.bin_to_eigenvalue(bin, t))
        .collect();

    let mut reasons = Vec::new();
    if !register.is_signed() {
        if let Some(lambda) = eigenvalues.iter().find(|&&l| l < -DISTINCT_EIGENVALUE_GAP) {
            reasons.push(format!(
                "eigenvalue {lambda:.6} is negative but negative_evals is off"
            ));
        }
    }
    for (&lambda, &bin) in eigenvalues.iter().zip(&bins) {
        if !register.holds_bin(bin) {
            reasons.push(format!(
                "eigenvalue {lambda:.6} lands in bin {bin}, outside the register"
            ));
        } else if bin == 0 && lambda.abs() > DISTINCT_EIGENVALUE_GAP {
            reasons.push(format!("eigenvalue {lambda:.6} rounds to the zero bin"));
        }
    }
    for i in 0..eigenvalues.len() {
        for j in i + 1..eigenvalues.len() {
            let distinct = (eigenvalues[i] - eigenvalues[j]).abs() > DISTINCT_EIGENVALUE_GAP;
            if distinct && bins[i] == bins[j] {
                reasons.push(format!(
                    "eigenvalues {:.6} and {:.6} share bin {}",
                    eigenvalues[i], eigenvalues[j], bins[i]
                ));
            }
        }
    }

    let precision = if reasons.is_empty() {
        Precision::Resolved
    } else {
        Precision::Insufficient {
            reason: reasons.join("; "),
        }
    };
    (precision, estimates)
}

//! Solver orchestration.
//!
//! One run walks the stages
//!
//! ```text
//! Init → Encode(b) → Estimate → Rotate → Uncompute → Measure → Extract
//!                                                           ↘ Abort
//! ```
//!
//! on a fresh [`StateVector`]. Nothing is retried: a run whose postselection
//! mass is below `min_success_probability` aborts with an all-zero solution.

use std::f64::consts::TAU;
use std::fmt;

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use tracing::{debug, instrument, warn};

use arvak_statevector::{Circuit, Control, StateVector};

use crate::config::{ResolvedConfig, SolverConfig};
use crate::error::{HhlError, SolveResult};
use crate::estimator::EigenvalueEstimator;
use crate::metrics::{Cost, Precision, RunMetrics, StageCost};
use crate::reciprocal::ReciprocalRotation;
use crate::register::{RegisterLayout, evolution_time};
use crate::system::LinearSystem;
use crate::uncompute::UncomputeStage;

/// Pipeline stage, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Validation and planning.
    Init,
    /// Amplitude encoding of b.
    Encode,
    /// Phase estimation.
    Estimate,
    /// Reciprocal rotation.
    Rotate,
    /// Inverse phase estimation.
    Uncompute,
    /// Ancilla postselection.
    Measure,
    /// Solution read-out.
    Extract,
    /// Postselection failed.
    Abort,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Encode => "encode",
            Self::Estimate => "estimate",
            Self::Rotate => "rotate",
            Self::Uncompute => "uncompute",
            Self::Measure => "measure",
            Self::Extract => "extract",
            Self::Abort => "abort",
        };
        f.write_str(name)
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The solution was extracted.
    Success,
    /// Postselection mass was below the threshold; the solution is zero.
    Aborted,
}

/// Result of one HHL run.
#[derive(Debug, Clone)]
pub struct HhlResult {
    /// Approximate x with `A·x ≈ b`, length `2^n`.
    pub solution: DVector<Complex64>,
    /// Probability of the ancilla reading 1.
    pub probability: f64,
    /// Elementary operations of the whole run.
    pub operation_count: u64,
    /// Dependency depth of the whole run.
    pub depth: u64,
    /// Success or abort.
    pub outcome: RunOutcome,
    /// Evolution time t used by phase estimation.
    pub evolution_time: f64,
    /// Reciprocal scale constant C.
    pub scale: f64,
    /// Width of the full register.
    pub num_qubits: usize,
    /// Whether the register resolves A's spectrum.
    pub precision: Precision,
    /// Exact eigenvalues of A, ascending.
    pub eigenvalues: Vec<f64>,
    /// Eigenvalues as the register represents them, in the same order.
    pub estimated_eigenvalues: Vec<f64>,
    /// Per-stage resource breakdown.
    pub stages: StageCost,
}

impl HhlResult {
    /// The metrics subset of the result.
    pub fn metrics(&self) -> RunMetrics {
        RunMetrics {
            operation_count: self.operation_count,
            depth: self.depth,
            success_probability: self.probability,
            stages: self.stages,
        }
    }

    /// True if the run extracted a solution.
    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Success
    }
}

/// Simulated HHL solver holding a validated configuration.
///
/// Holds no per-run state, so one solver can serve concurrent runs.
#[derive(Debug)]
pub struct HhlSolver {
    config: ResolvedConfig,
}

impl HhlSolver {
    /// Validate `config` and build a solver.
    pub fn new(config: SolverConfig) -> SolveResult<Self> {
        Ok(Self {
            config: config.validate()?,
        })
    }

    /// Build a solver from an already resolved configuration.
    pub fn from_resolved(config: ResolvedConfig) -> Self {
        Self { config }
    }

    /// The resolved configuration.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Validate `matrix` and `vector` with this solver's tolerance and solve.
    pub fn solve_dense(
        &self,
        matrix: DMatrix<Complex64>,
        vector: DVector<Complex64>,
    ) -> SolveResult<HhlResult> {
        let system = LinearSystem::new(matrix, vector, self.config.hermitian_tolerance)?;
        self.solve(&system)
    }

    /// Run the pipeline once on `system`.
    #[instrument(skip_all, fields(dim = system.dim(), k = self.config.num_ancillae))]
    pub fn solve(&self, system: &LinearSystem) -> SolveResult<HhlResult> {
        let config = &self.config;
        enter(Stage::Init);

        let layout = RegisterLayout::new(system.num_qubits(), config.num_ancillae);
        let total = layout.total_qubits();
        if total > config.max_qubits {
            return Err(HhlError::RegisterTooLarge {
                requested: total,
                max: config.max_qubits,
            });
        }

        let eigenvalues = arvak_sim::eigenvalues(system.matrix(), config.hermitian_tolerance)?;
        let lambda_max = eigenvalues.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        let t = config
            .evo_time
            .unwrap_or_else(|| evolution_time(lambda_max, config.negative_evals));
        let scale = config.scale.value(config.num_ancillae);
        debug!(
            n = system.num_qubits(),
            k = config.num_ancillae,
            total_qubits = total,
            lambda_max,
            t,
            scale,
            "planned run"
        );

        let estimator = EigenvalueEstimator::new(
            system.matrix(),
            t,
            config.expansion,
            config.hermitian_tolerance,
            layout,
            config.negative_evals,
        )?;
        let (precision, estimated_eigenvalues) = estimator.assess_precision(&eigenvalues);
        if let Precision::Insufficient { reason } = &precision {
            warn!(%reason, "eigenvalue register precision is insufficient");
        }

        let estimate = estimator.circuit()?;
        let rotation = ReciprocalRotation::build(
            config.reciprocal.as_ref(),
            estimator.register(),
            layout.ancilla(),
            scale,
            total,
        )?;
        let uncompute = UncomputeStage::new(&estimate, layout.ancilla());

        let mut combined = Circuit::new("hhl", total);
        combined
            .append(&estimate)?
            .append(rotation.circuit())?
            .append(uncompute.circuit())?;
        let stages = StageCost {
            estimate: Cost::of(&estimate),
            rotate: Cost::of(rotation.circuit()),
            uncompute: Cost::of(uncompute.circuit()),
        };
        // Encoding and the final measurement count as one operation each.
        let operation_count = combined.num_ops().saturating_add(2);
        let depth = combined.depth().saturating_add(2);

        let mut state = StateVector::new(total, config.max_qubits)?;
        let main: Vec<usize> = layout.main_qubits().collect();

        enter(Stage::Encode);
        state.initialize(&main, &system.normalized_rhs())?;

        enter(Stage::Estimate);
        state.run(&estimate)?;

        enter(Stage::Rotate);
        state.run(rotation.circuit())?;

        enter(Stage::Uncompute);
        uncompute.uncompute(&mut state)?;

        enter(Stage::Measure);
        let probability = uncompute.postselect(&mut state)?;

        let (solution, outcome) = if probability < config.min_success_probability {
            enter(Stage::Abort);
            warn!(
                probability,
                threshold = config.min_success_probability,
                "postselection mass below threshold, aborting"
            );
            (
                DVector::from_element(system.dim(), Complex64::new(0.0, 0.0)),
                RunOutcome::Aborted,
            )
        } else {
            enter(Stage::Extract);
            let mut fixed: Vec<Control> = layout.eigen_qubits().map(Control::off).collect();
            fixed.push(Control::on(layout.ancilla()));
            let amplitudes = state.conditional_amplitudes(&main, &fixed)?;
            // Undo the postselection renormalization, then map C/λ̃ back to 1/λ.
            let factor = probability.sqrt() * system.rhs_norm() * t / (TAU * scale);
            let solution = DVector::from_iterator(
                system.dim(),
                amplitudes.into_iter().map(|a| a * factor),
            );
            (solution, RunOutcome::Success)
        };

        debug!(
            probability,
            operation_count,
            depth,
            ?outcome,
            "run finished"
        );

        Ok(HhlResult {
            solution,
            probability,
            operation_count,
            depth,
            outcome,
            evolution_time: t,
            scale,
            num_qubits: total,
            precision,
            eigenvalues,
            estimated_eigenvalues,
            stages,
        })
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "entering stage");
}

/// Solve `matrix · x = vector` with `config`.
pub fn solve(
    matrix: &DMatrix<Complex64>,
    vector: &DVector<Complex64>,
    config: SolverConfig,
) -> SolveResult<HhlResult> {
    let solver = HhlSolver::new(config)?;
    solver.solve_dense(matrix.clone(), vector.clone())
}

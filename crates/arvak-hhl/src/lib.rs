//! `arvak-hhl`: simulated HHL linear-system solver.
//!
//! Solves `A·x = b` for a Hermitian `2^n × 2^n` matrix by simulating the
//! Harrow-Hassidim-Lloyd pipeline on a dense statevector:
//!
//! 1. **Encode** `b / ‖b‖` into the main register.
//! 2. **Estimate** A's eigenvalues into a `k`-bit register by phase
//!    estimation over `exp(-iAt)` ([`estimator`]).
//! 3. **Rotate** an ancilla by `asin(C/λ̃)` for every eigenvalue bin
//!    ([`reciprocal`]).
//! 4. **Uncompute** the estimation and postselect the ancilla on 1
//!    ([`uncompute`]).
//! 5. **Extract** the main-register amplitudes and undo every normalization.
//!
//! Each run reports the success probability, the operation count and
//! dependency depth of the simulated circuit, and an advisory
//! [`Precision`] signal.
//!
//! # Example
//!
//! ```rust
//! use arvak_hhl::{LinearSystem, HhlSolver, SolverConfig, fidelity};
//! use nalgebra::DVector;
//! use num_complex::Complex64;
//!
//! let system = LinearSystem::from_real(&[1.0, 0.0, 0.0, 2.0], &[1.0, 4.0], 1e-9).unwrap();
//! let solver = HhlSolver::new(SolverConfig::default()).unwrap();
//! let result = solver.solve(&system).unwrap();
//!
//! let expected = DVector::from_vec(vec![Complex64::new(1.0, 0.0), Complex64::new(2.0, 0.0)]);
//! assert!((&result.solution - &expected).norm() < 0.1);
//! assert!(fidelity(&result.solution, &expected) > 0.99);
//! ```

pub mod config;
pub mod error;
pub mod estimator;
pub mod metrics;
pub mod qft;
pub mod reciprocal;
pub mod register;
pub mod solver;
pub mod system;
pub mod uncompute;

pub use config::{
    Expansion, ExpansionMode, ReciprocalKind, ResolvedConfig, Scale, SolverConfig,
};
pub use error::{HhlError, SolveResult};
pub use estimator::EigenvalueEstimator;
pub use metrics::{Cost, Precision, RunMetrics, StageCost, fidelity};
pub use reciprocal::{
    ExactReciprocal, LookupReciprocal, LookupTable, ReciprocalRotation, ReciprocalStrategy,
    RotationRule,
};
pub use register::{EigenvalueRegister, RegisterLayout, SPECTRUM_FILL, evolution_time};
pub use solver::{HhlResult, HhlSolver, RunOutcome, Stage, solve};
pub use system::LinearSystem;
pub use uncompute::UncomputeStage;

//! Demo linear systems and the classical reference solve.

use anyhow::{Context, Result, anyhow};
use arvak_hhl::{LinearSystem, Scale, SolverConfig};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A named system with the configuration it is demonstrated with.
#[derive(Debug, Clone)]
pub struct DemoCase {
    /// Display name.
    pub name: String,
    /// The system to solve.
    pub system: LinearSystem,
    /// Solver configuration.
    pub config: SolverConfig,
}

/// The three walkthrough cases, each starting from `base`.
pub fn walkthrough(base: &SolverConfig) -> Result<Vec<DemoCase>> {
    let tol = base.hermitian_tolerance;
    let diag = LinearSystem::from_real(&[1.0, 0.0, 0.0, 2.0], &[1.0, 4.0], tol)
        .context("building diag(1, 2)")?;
    let mixed = LinearSystem::from_real(&[1.0, 3.0, 3.0, 2.0], &[1.0, 1.0], tol)
        .context("building [[1, 3], [3, 2]]")?;

    Ok(vec![
        DemoCase {
            name: "diag(1, 2), b = (1, 4)".to_string(),
            system: diag.clone(),
            config: base.clone(),
        },
        DemoCase {
            name: "diag(1, 2), scale 0.5".to_string(),
            system: diag,
            config: SolverConfig {
                scale: Scale::Fixed(0.5),
                ..base.clone()
            },
        },
        DemoCase {
            name: "[[1, 3], [3, 2]], b = (1, 1), negative eigenvalues".to_string(),
            system: mixed,
            config: SolverConfig {
                negative_evals: true,
                ..base.clone()
            },
        },
    ])
}

/// Seeded random Hermitian system on `num_qubits` main qubits with a real
/// right-hand side.
pub fn random_case(num_qubits: usize, seed: u64, base: &SolverConfig) -> Result<DemoCase> {
    let dim = 1usize << num_qubits;
    let mut rng = StdRng::seed_from_u64(seed);
    let m = DMatrix::from_fn(dim, dim, |_, _| {
        Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
    });
    let a = (&m + m.adjoint()) * Complex64::new(0.5, 0.0);
    let b = DVector::from_fn(dim, |_, _| Complex64::new(rng.gen_range(-1.0..1.0), 0.0));
    let system = LinearSystem::new(a, b, base.hermitian_tolerance)
        .context("building random Hermitian system")?;
    Ok(DemoCase {
        name: format!("random {dim}x{dim} (seed {seed})"),
        system,
        config: SolverConfig {
            negative_evals: true,
            ..base.clone()
        },
    })
}

/// Classical solution by LU decomposition.
pub fn classical_solve(system: &LinearSystem) -> Result<DVector<Complex64>> {
    system
        .matrix()
        .clone()
        .lu()
        .solve(system.rhs())
        .ok_or_else(|| anyhow!("matrix is singular"))
}

/// Format a complex vector compactly.
pub fn format_vector(v: &DVector<Complex64>) -> String {
    let parts: Vec<String> = v
        .iter()
        .map(|c| {
            if c.im.abs() < 5e-5 {
                format!("{:.4}", c.re)
            } else {
                format!("{:.4}{:+.4}i", c.re, c.im)
            }
        })
        .collect();
    format!("({})", parts.join(", "))
}

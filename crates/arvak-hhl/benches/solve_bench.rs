//! Benchmarks for the HHL solver
//!
//! Run with: cargo bench -p arvak-hhl

use arvak_hhl::{ExpansionMode, HhlSolver, LinearSystem, ReciprocalKind, SolverConfig};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use nalgebra::DMatrix;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded random Hermitian system on `n` main qubits.
fn random_system(n: usize, seed: u64) -> LinearSystem {
    let dim = 1 << n;
    let mut rng = StdRng::seed_from_u64(seed);
    let m = DMatrix::from_fn(dim, dim, |_, _| {
        Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
    });
    let a = (&m + m.adjoint()) * Complex64::new(0.5, 0.0);
    let b = nalgebra::DVector::from_fn(dim, |_, _| Complex64::new(rng.gen_range(-1.0..1.0), 0.0));
    LinearSystem::new(a, b, 1e-9).unwrap()
}

/// Benchmark a full run as the eigenvalue register grows
fn bench_num_ancillae(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_num_ancillae");
    let system = random_system(2, 7);

    for k in &[3usize, 5, 7] {
        let solver = HhlSolver::new(SolverConfig {
            num_ancillae: *k,
            negative_evals: true,
            ..SolverConfig::default()
        })
        .unwrap();
        group.bench_with_input(BenchmarkId::new("suzuki2", k), k, |b, _| {
            b.iter(|| solver.solve(black_box(&system)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark evolution construction modes
fn bench_expansion_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_expansion_mode");
    let system = random_system(3, 11);

    for mode in [ExpansionMode::Exact, ExpansionMode::Trotter, ExpansionMode::Suzuki] {
        let solver = HhlSolver::new(SolverConfig {
            expansion_mode: mode,
            negative_evals: true,
            ..SolverConfig::default()
        })
        .unwrap();
        group.bench_function(mode.to_string(), |b| {
            b.iter(|| solver.solve(black_box(&system)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark reciprocal strategies on a wide register
fn bench_reciprocal(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_reciprocal");
    let system = random_system(1, 3);

    for (name, kind) in [("exact", ReciprocalKind::Exact), ("lookup", ReciprocalKind::Lookup)] {
        let solver = HhlSolver::new(SolverConfig {
            num_ancillae: 9,
            expansion_mode: ExpansionMode::Exact,
            reciprocal_strategy: kind,
            lookup_pattern_bits: Some(3),
            negative_evals: true,
            ..SolverConfig::default()
        })
        .unwrap();
        group.bench_function(name, |b| {
            b.iter(|| solver.solve(black_box(&system)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_num_ancillae,
    bench_expansion_modes,
    bench_reciprocal
);
criterion_main!(benches);

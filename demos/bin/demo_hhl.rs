//! HHL Linear-System Solver Demo
//!
//! Runs the walkthrough systems and a seeded random system through the
//! simulated HHL solver and compares each against a classical LU solve.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use arvak_demos::systems::{DemoCase, classical_solve, format_vector, random_case, walkthrough};
use arvak_demos::{
    parse_expansion_mode, print_header, print_info, print_result, print_section, print_success,
    print_warning,
};
use arvak_hhl::{
    ExpansionMode, HhlResult, HhlSolver, Precision, ReciprocalKind, RunOutcome, SolverConfig,
    fidelity,
};

#[derive(Parser, Debug)]
#[command(name = "demo-hhl")]
#[command(about = "Demonstrate the simulated HHL linear-system solver")]
struct Args {
    /// Solver configuration file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Eigenvalue register width (overrides the configuration)
    #[arg(short = 'k', long)]
    ancillae: Option<usize>,

    /// Evolution construction: exact, trotter or suzuki
    #[arg(short, long, value_parser = parse_expansion_mode)]
    mode: Option<ExpansionMode>,

    /// Use the exact reciprocal instead of the lookup table
    #[arg(long)]
    exact_reciprocal: bool,

    /// Main-register width of the random system (0 = skip)
    #[arg(short = 'n', long, default_value = "2")]
    random_qubits: usize,

    /// Seed of the random system
    #[arg(short, long, default_value = "7")]
    seed: u64,

    /// Run the cases one after another instead of on parallel threads
    #[arg(long)]
    sequential: bool,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn base_config(args: &Args) -> Result<SolverConfig> {
    let mut config = match &args.config {
        Some(path) => SolverConfig::from_file(path)
            .with_context(|| format!("loading solver configuration {}", path.display()))?,
        None => SolverConfig::default(),
    };
    if let Some(k) = args.ancillae {
        config.num_ancillae = k;
    }
    if let Some(mode) = args.mode {
        config.expansion_mode = mode;
    }
    if args.exact_reciprocal {
        config.reciprocal_strategy = ReciprocalKind::Exact;
    }
    Ok(config)
}

fn run_case(case: &DemoCase) -> Result<HhlResult> {
    let solver = HhlSolver::new(case.config.clone())
        .with_context(|| format!("configuring '{}'", case.name))?;
    solver
        .solve(&case.system)
        .with_context(|| format!("solving '{}'", case.name))
}

fn report(case: &DemoCase, result: &HhlResult) -> Result<()> {
    print_section(&case.name);
    let reference = classical_solve(&case.system)?;

    print_result(
        "Configuration",
        format!(
            "{} (order {}, {} slices), k = {}, {} reciprocal",
            case.config.expansion_mode,
            case.config.expansion_order,
            case.config.num_time_slices,
            case.config.num_ancillae,
            case.config.reciprocal_strategy,
        ),
    );
    print_result("Eigenvalues", format!("{:.4?}", result.eigenvalues));
    print_result("Estimated", format!("{:.4?}", result.estimated_eigenvalues));
    print_result("Evolution time", format!("{:.4}", result.evolution_time));
    print_result("Scale", format!("{:.4}", result.scale));
    print_result("Register", format!("{} qubits", result.num_qubits));
    print_result("HHL solution", format_vector(&result.solution));
    print_result("Classical solution", format_vector(&reference));
    print_result("Fidelity", format!("{:.6}", fidelity(&result.solution, &reference)));
    print_result("Success probability", format!("{:.6}", result.probability));
    print_result("Operations", result.operation_count);
    print_result("Depth", result.depth);
    print_result(
        "Stage ops (estimate / rotate / uncompute)",
        format!(
            "{} / {} / {}",
            result.stages.estimate.operations,
            result.stages.rotate.operations,
            result.stages.uncompute.operations
        ),
    );

    if let Precision::Insufficient { reason } = &result.precision {
        print_warning(&format!("Precision insufficient: {reason}"));
    }
    match result.outcome {
        RunOutcome::Success => print_success("Solution extracted"),
        RunOutcome::Aborted => print_warning("Postselection failed; solution is zero"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    print_header("HHL Linear-System Solver Demo");

    let base = base_config(&args)?;
    let mut cases = walkthrough(&base)?;
    if args.random_qubits > 0 {
        cases.push(random_case(args.random_qubits, args.seed, &base)?);
    }
    print_info(&format!("Running {} systems", cases.len()));
    info!(cases = cases.len(), parallel = !args.sequential, "starting demo");

    let results: Vec<Result<HhlResult>> = if args.sequential {
        cases.iter().map(run_case).collect()
    } else {
        std::thread::scope(|s| {
            let handles: Vec<_> = cases
                .iter()
                .map(|case| s.spawn(move || run_case(case)))
                .collect();
            handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .unwrap_or_else(|_| Err(anyhow::anyhow!("solver thread panicked")))
                })
                .collect()
        })
    };

    for (case, result) in cases.iter().zip(results) {
        report(case, &result?)?;
    }

    println!();
    print_success("Demo complete");
    Ok(())
}

//! Arvak Demo Suite
//!
//! Walkthrough of the simulated HHL solver:
//!
//! - **diag(1, 2)** with the default configuration
//! - the same system with a fixed reciprocal scale of 0.5
//! - **[[1, 3], [3, 2]]**, whose spectrum has a negative eigenvalue
//! - a seeded random Hermitian system
//!
//! Every run is compared against a classical LU solve.

pub mod systems;

use arvak_hhl::ExpansionMode;
use console::style;

/// Parse an `--mode` argument with the same spelling configuration files use.
pub fn parse_expansion_mode(value: &str) -> Result<ExpansionMode, String> {
    serde_yaml_ng::from_str(value).map_err(|_| {
        format!("unknown expansion mode '{value}' (expected exact, trotter or suzuki)")
    })
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("⚠").yellow().bold(), message);
}

//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use vala_solver::{AnsatzKind, Problem, SolverConfig};

/// Problem selection shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct ProblemArgs {
    /// Ansatz family (original, simple, two_local, swap_distro, compact)
    #[arg(short, long)]
    pub ansatz: Option<AnsatzKind>,

    /// Number of entangling layers
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Use the hermitized embedding (one extra qubit)
    #[arg(long)]
    pub hermitize: bool,
}

/// Defaults, then the config file, then `VALA_*` variables, then flags.
pub fn load_config(config_file: Option<&Path>, problem: &ProblemArgs) -> Result<SolverConfig> {
    let mut config = SolverConfig::load(config_file).with_context(|| match config_file {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration from the environment".to_string(),
    })?;
    if let Some(ansatz) = problem.ansatz {
        config.ansatz = ansatz;
    }
    if let Some(depth) = problem.depth {
        config.depth = depth;
    }
    if problem.hermitize {
        config.hermitize = true;
    }
    Ok(config)
}

/// Validate the final configuration and build the problem.
pub fn build_problem(config: &SolverConfig) -> Result<Problem> {
    Problem::from_config(config).context("Failed to set up the problem")
}

/// Progress bar for a known number of steps.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Print a command header.
pub fn print_header(title: &str) {
    println!("{} {}", style("→").cyan().bold(), style(title).bold());
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!("\n{}", style(format!("── {title} ──")).cyan().bold());
}

/// Print a `label: value` line.
pub fn print_kv(label: &str, value: impl std::fmt::Display) {
    println!("  {:<18} {}", style(format!("{label}:")).dim(), value);
}

/// Format a slice of floats as `[a, b, c]` with `decimals` places.
pub fn format_values(values: &[f64], decimals: usize) -> String {
    let body: Vec<String> = values.iter().map(|v| format!("{v:.decimals$}")).collect();
    format!("[{}]", body.join(", "))
}

//! Solve command implementation.

use anyhow::{Context, Result};
use console::style;

use vala_solver::SolverConfig;
use vala_solver::linalg::format_sig;

use super::common::{build_problem, create_progress_bar, format_values, print_header, print_kv};

/// Execute the solve command.
pub fn execute(config: SolverConfig, name: &str, progress: bool) -> Result<()> {
    let problem = build_problem(&config)?;
    let ansatz = problem.ansatz();

    print_header(&format!(
        "Solving {}×{} system on {} qubits",
        problem.system().target().len(),
        problem.system().target().len(),
        problem.system().num_qubits()
    ));
    println!(
        "  Ansatz: {} (depth {}, {} parameters), {} Pauli terms",
        style(ansatz.kind()).green(),
        ansatz.depth(),
        ansatz.num_parameters(),
        problem.pauli().num_terms()
    );
    println!(
        "  Optimizer: {} lr={} iters={} gradient={}",
        style(config.optimizer).yellow(),
        config.lr,
        config.iters,
        config.gradient
    );

    let pb = progress.then(|| create_progress_bar(config.iters as u64, "training"));
    let solution = problem
        .solve(|step| {
            if let Some(pb) = &pb {
                pb.set_position(step.iteration as u64);
                pb.set_message(format!("loss {}", format_sig(step.loss)));
            }
        })
        .context("Training failed")?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let report = &solution.report;
    let training = &report.training;
    println!(
        "\n{} Trained in {} iterations{}",
        style("✓").green().bold(),
        training.iterations,
        if training.converged { " (converged)" } else { "" }
    );
    print_kv("initial loss", format_sig(training.initial_loss()));
    print_kv("final loss", format_sig(training.final_loss));
    print_kv("params", format_values(&training.optimal_params, 4));

    println!("\n{}", style("Circuit").bold());
    for line in vala_ir::draw(&solution.circuit).lines() {
        println!("  {line}");
    }

    println!("\n{}", style("Exact readout").bold());
    print_kv("|x~>", format_values(&report.exact.x_tilde, 4));
    print_kv("fidelity", format!("{:.6}", report.exact.fidelity));
    print_kv("x", format_values(&report.exact.x_hat, 4));
    print_kv("L1 error", format_sig(report.exact.l1_error));

    println!(
        "\n{} ({} shots)",
        style("Sampled readout").bold(),
        config.shots
    );
    match &report.sampled {
        Some(sampled) => {
            print_kv("|x~_q>", format_values(&sampled.x_tilde, 4));
            print_kv("fidelity", format!("{:.6}", sampled.fidelity));
            print_kv("x_q", format_values(&sampled.x_hat, 4));
            print_kv("L1 error", format_sig(sampled.l1_error));
        }
        None => println!(
            "  {} indicator outcome never observed; nothing to rescale",
            style("!").yellow().bold()
        ),
    }

    let paths = solution
        .write_artifacts(&config.output_dir, name)
        .with_context(|| format!("Failed to write artifacts to {}", config.output_dir.display()))?;
    println!();
    print_kv("report", paths.report.display());
    print_kv("loss curve", paths.loss_svg.display());
    print_kv("loss csv", paths.loss_csv.display());
    print_kv("circuit", paths.qasm.display());

    Ok(())
}

//! Inspect command implementation.

use anyhow::{Context, Result};
use console::style;

use vala_solver::SolverConfig;
use vala_solver::linalg::{describe_matrix, describe_vector, format_matrix, format_sig, format_vector};
use vala_solver::state::state_label;

use super::common::{build_problem, format_values, print_header, print_kv, print_section};

/// Execute the inspect command.
pub fn execute(config: &SolverConfig, decimals: usize) -> Result<()> {
    let problem = build_problem(config)?;
    let system = problem.system();

    print_header(&format!(
        "{}×{} system embedded in {} dimensions ({} qubits{})",
        system.target().len(),
        system.target().len(),
        system.dim(),
        system.num_qubits(),
        if system.is_hermitized() { ", hermitized" } else { "" }
    ));

    print_section("Normalized system");
    println!("{}", describe_matrix("A", system.a())?);
    println!("{}", format_matrix(system.a(), decimals));
    println!("{}", describe_vector("|b>", system.b()));
    println!("{}", format_vector(system.b(), decimals));
    println!("{}", describe_vector("|x>", system.x()));
    println!("{}", format_vector(system.x(), decimals));
    if system.num_qubits() == 1 {
        print_kv("|x> as state", state_label(system.x())?);
    }

    let fid = system
        .encoding_fidelity()
        .context("Failed to compute encoding fidelity")?;
    print_kv("indicator index", system.indicator());
    print_kv("|<b|A|x>|", format!("{fid:.6}"));
    print_kv("target x", format_values(system.target(), decimals));

    print_section("Hamiltonian H_A");
    let h = problem.hamiltonian();
    println!("{}", describe_matrix("H_A", h.matrix())?);
    let eigenvalues = h.eigenvalues()?;
    print_kv("spectrum", format_values(&eigenvalues, decimals));
    let x: Vec<_> = system.x().to_vec();
    print_kv("<x|H_A|x>", format_sig(h.expectation(&x)?));
    print_kv("pauli terms", problem.pauli().num_terms());

    if fid < 1.0 - 1e-9 {
        println!(
            "\n{} encoding fidelity below 1; check A·x = b",
            style("!").yellow().bold()
        );
    }
    Ok(())
}

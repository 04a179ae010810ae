//! Hamiltonian command implementation.

use anyhow::Result;

use vala_solver::SolverConfig;

use super::common::{build_problem, print_header};

/// Execute the hamiltonian command.
pub fn execute(config: &SolverConfig, format: &str) -> Result<()> {
    let problem = build_problem(config)?;
    let pauli = problem.pauli();

    match format.to_lowercase().as_str() {
        "text" | "table" => {
            print_header(&format!(
                "H_A on {} qubits, identity coefficient {:.6}",
                problem.hamiltonian().num_qubits(),
                pauli.identity_coefficient()
            ));
            print!("{pauli}");
        }
        "json" => println!("{}", serde_json::to_string_pretty(pauli)?),
        other => anyhow::bail!("Unknown format: '{other}'. Available: text, json"),
    }
    Ok(())
}

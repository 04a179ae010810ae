//! Draw command implementation.

use anyhow::{Context, Result};

use vala_solver::{Ansatz, SolverConfig};

use super::common::{build_problem, print_header};

/// Execute the draw command.
pub fn execute(config: &SolverConfig, params: Option<&[f64]>, qasm: Option<u8>) -> Result<()> {
    let problem = build_problem(config)?;
    let ansatz: &Ansatz = problem.ansatz();
    let zeros = vec![0.0; ansatz.num_parameters()];
    let params = params.unwrap_or(&zeros);
    let circuit = ansatz.build(params).context("Failed to build ansatz")?;

    match qasm {
        None => {
            print_header(&format!(
                "{} ansatz: {} qubits, {} parameters, depth {}, {} CNOTs",
                ansatz.kind(),
                circuit.num_qubits(),
                ansatz.num_parameters(),
                circuit.depth(),
                circuit.num_entangling_gates()
            ));
            println!("{}", vala_ir::draw(&circuit));
        }
        Some(2) => print!("{}", vala_qasm::emit_qasm2(&circuit)?),
        Some(3) => print!("{}", vala_qasm::emit(&circuit)?),
        Some(other) => anyhow::bail!("Unknown QASM version: {other}. Available: 2, 3"),
    }
    Ok(())
}

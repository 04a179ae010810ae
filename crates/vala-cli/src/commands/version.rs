//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - variational quantum linear solver",
        style("VALA").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  vala-ir      Circuit intermediate representation");
    println!("  vala-qasm    OpenQASM 2.0 / 3.0 export");
    println!("  vala-sim     Statevector simulator");
    println!("  vala-solver  Embedding, Hamiltonian, ansatz, training, readout");
    println!("  vala-cli     Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}

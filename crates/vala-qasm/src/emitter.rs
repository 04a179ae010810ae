//! QASM emitters for serializing circuits.

use vala_ir::{Circuit, Instruction, QubitId};

use crate::error::{QasmError, QasmResult};

/// Emit a circuit as QASM3 source code.
pub fn emit(circuit: &Circuit) -> QasmResult<String> {
    let mut emitter = Emitter::new(Dialect::Qasm3);
    emitter.emit_circuit(circuit)
}

/// Emit a circuit as QASM 2.0 source code.
///
/// Register declarations use the QASM2 style (`qreg q[n];` / `creg c[n];`).
/// The classical register is declared for compatibility with tools that
/// expect one, but no measurements are written.
pub fn emit_qasm2(circuit: &Circuit) -> QasmResult<String> {
    let mut emitter = Emitter::new(Dialect::Qasm2);
    emitter.emit_circuit(circuit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Qasm2,
    Qasm3,
}

struct Emitter {
    dialect: Dialect,
    output: String,
}

impl Emitter {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            output: String::new(),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) -> QasmResult<String> {
        let num_qubits = circuit.num_qubits();
        if num_qubits == 0 {
            return Err(QasmError::EmptyRegister(circuit.name().to_string()));
        }

        match self.dialect {
            Dialect::Qasm2 => {
                self.writeln("OPENQASM 2.0;");
                self.writeln("include \"qelib1.inc\";");
                self.writeln(&format!("qreg q[{num_qubits}];"));
                self.writeln(&format!("creg c[{num_qubits}];"));
            }
            Dialect::Qasm3 => {
                self.writeln("OPENQASM 3.0;");
                self.writeln("include \"stdgates.inc\";");
                self.writeln("");
                self.writeln(&format!("qubit[{num_qubits}] q;"));
                self.writeln(&format!("bit[{num_qubits}] c;"));
                self.writeln("");
            }
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction)?;
        }

        Ok(std::mem::take(&mut self.output))
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> QasmResult<()> {
        let name = instruction.name();
        let qubits = self.emit_qubits(&instruction.qubits);

        match instruction.gate.parameter() {
            Some(value) => {
                let param = emit_param(name, value)?;
                self.writeln(&format!("{name}({param}) {qubits};"));
            }
            None => self.writeln(&format!("{name} {qubits};")),
        }
        Ok(())
    }

    fn emit_qubits(&self, qubits: &[QubitId]) -> String {
        let separator = match self.dialect {
            Dialect::Qasm2 => ",",
            Dialect::Qasm3 => ", ",
        };
        qubits
            .iter()
            .map(|q| format!("q[{}]", q.0))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

/// Format an angle, snapping to common fractions of pi.
fn emit_param(gate: &str, value: f64) -> QasmResult<String> {
    if !value.is_finite() {
        return Err(QasmError::InvalidParameter {
            gate: gate.to_string(),
            value,
        });
    }

    let pi = std::f64::consts::PI;
    let named = [
        (pi, "pi"),
        (-pi, "-pi"),
        (pi / 2.0, "pi/2"),
        (-pi / 2.0, "-pi/2"),
        (pi / 4.0, "pi/4"),
        (-pi / 4.0, "-pi/4"),
    ];
    if let Some((_, text)) = named.iter().find(|(v, _)| (value - v).abs() < 1e-10) {
        return Ok((*text).to_string());
    }
    Ok(format!("{value:.12}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_circuit() -> Circuit {
        let mut circuit = Circuit::with_size("sample", 2);
        circuit
            .ry(0.25, QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .rz(std::f64::consts::FRAC_PI_2, QubitId(1))
            .unwrap();
        circuit
    }

    #[test]
    fn test_emit_qasm2() {
        let qasm = emit_qasm2(&sample_circuit()).unwrap();
        let expected = "OPENQASM 2.0;\n\
                        include \"qelib1.inc\";\n\
                        qreg q[2];\n\
                        creg c[2];\n\
                        ry(0.250000000000) q[0];\n\
                        cx q[0],q[1];\n\
                        rz(pi/2) q[1];\n";
        assert_eq!(qasm, expected);
        assert!(!qasm.contains("measure"));
    }

    #[test]
    fn test_emit_qasm3() {
        let qasm = emit(&sample_circuit()).unwrap();
        assert!(qasm.starts_with("OPENQASM 3.0;"));
        assert!(qasm.contains("qubit[2] q;"));
        assert!(qasm.contains("bit[2] c;"));
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("rz(pi/2) q[1];"));
    }

    #[test]
    fn test_empty_register_rejected() {
        let circuit = Circuit::new("nothing");
        assert!(matches!(
            emit_qasm2(&circuit),
            Err(QasmError::EmptyRegister(_))
        ));
    }

    #[test]
    fn test_param_snapping() {
        assert_eq!(emit_param("ry", -std::f64::consts::PI).unwrap(), "-pi");
        assert_eq!(emit_param("ry", 0.0).unwrap(), "0.000000000000");
        assert!(emit_param("ry", f64::INFINITY).is_err());
    }
}

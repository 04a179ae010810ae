//! Property-based tests for emitted QASM.
//!
//! Every instruction becomes exactly one statement and every statement
//! references declared qubits only.

use proptest::prelude::*;
use vala_ir::{Circuit, QubitId};
use vala_qasm::{emit, emit_qasm2};

#[derive(Debug, Clone)]
enum GateOp {
    Ry(f64, u32),
    Rz(f64, u32),
    H(u32),
    CX(u32, u32),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        let _ = match self {
            GateOp::Ry(theta, q) => circuit.ry(theta, QubitId(q)),
            GateOp::Rz(theta, q) => circuit.rz(theta, QubitId(q)),
            GateOp::H(q) => circuit.h(QubitId(q)),
            GateOp::CX(c, t) => circuit.cx(QubitId(c), QubitId(t)),
        };
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let angle = -6.3_f64..6.3;
    if num_qubits < 2 {
        prop_oneof![
            (angle.clone(), 0..num_qubits).prop_map(|(a, q)| GateOp::Ry(a, q)),
            (angle, 0..num_qubits).prop_map(|(a, q)| GateOp::Rz(a, q)),
            (0..num_qubits).prop_map(GateOp::H),
        ]
        .boxed()
    } else {
        prop_oneof![
            (angle.clone(), 0..num_qubits).prop_map(|(a, q)| GateOp::Ry(a, q)),
            (angle, 0..num_qubits).prop_map(|(a, q)| GateOp::Rz(a, q)),
            (0..num_qubits).prop_map(GateOp::H),
            (0..num_qubits, 0..num_qubits)
                .prop_filter("distinct qubits", |(c, t)| c != t)
                .prop_map(|(c, t)| GateOp::CX(c, t)),
        ]
        .boxed()
    }
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=4).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 0..=12).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("prop", num_qubits);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

fn referenced_qubits(line: &str) -> Vec<usize> {
    line.match_indices("q[")
        .filter_map(|(start, _)| {
            let rest = &line[start + 2..];
            let end = rest.find(']')?;
            rest[..end].parse().ok()
        })
        .collect()
}

proptest! {
    #[test]
    fn qasm2_has_one_statement_per_instruction(circuit in arb_circuit()) {
        let qasm = emit_qasm2(&circuit).unwrap();
        // Header: version, include, qreg, creg.
        let body: Vec<&str> = qasm.lines().skip(4).collect();
        prop_assert_eq!(body.len(), circuit.num_ops());
        for line in &body {
            prop_assert!(line.ends_with(';'));
            for q in referenced_qubits(line) {
                prop_assert!(q < circuit.num_qubits());
            }
        }
    }

    #[test]
    fn qasm3_declares_register_once(circuit in arb_circuit()) {
        let qasm = emit(&circuit).unwrap();
        let declaration = format!("qubit[{}] q;", circuit.num_qubits());
        prop_assert_eq!(qasm.matches(&declaration).count(), 1);
        prop_assert!(!qasm.contains("measure"));
    }
}

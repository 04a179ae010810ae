//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// A quantum circuit.
///
/// Instructions are kept in application order. The builder validates every
/// operand against the circuit width, so a constructed circuit is always
/// well-formed for the simulator and the emitters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit without qubits.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_size(name, 0)
    }

    /// Create a circuit with a given number of qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
        }
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.num_qubits);
        self.num_qubits += 1;
        id
    }

    /// Append an instruction after validating its operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let gate_name = instruction.name();
        let expected = instruction.gate.num_qubits();
        let got = instruction.qubits.len() as u32;
        if expected != got {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate_name.into(),
                expected,
                got,
            });
        }

        for (i, &qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name: gate_name.into(),
                });
            }
            if instruction.qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.into(),
                });
            }
        }

        if let Some(value) = instruction.gate.parameter() {
            if !value.is_finite() {
                return Err(IrError::NonFiniteParameter {
                    gate_name: gate_name.into(),
                    value,
                });
            }
        }

        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Get the number of operations.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Number of parameterized gates.
    pub fn num_parameters(&self) -> usize {
        self.instructions
            .iter()
            .filter(|inst| inst.gate.is_parameterized())
            .count()
    }

    /// Rotation angles in application order.
    pub fn parameters(&self) -> Vec<f64> {
        self.instructions
            .iter()
            .filter_map(|inst| inst.gate.parameter())
            .collect()
    }

    /// Get the circuit depth (longest chain of instructions sharing a wire).
    pub fn depth(&self) -> usize {
        let mut level = vec![0_usize; self.num_qubits()];
        for inst in &self.instructions {
            let next = inst
                .qubits
                .iter()
                .map(|q| level[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &inst.qubits {
                level[q.index()] = next;
            }
        }
        level.into_iter().max().unwrap_or(0)
    }

    /// Count of two-qubit gates.
    pub fn num_entangling_gates(&self) -> usize {
        self.instructions
            .iter()
            .filter(|inst| inst.qubits.len() == 2)
            .count()
    }
}

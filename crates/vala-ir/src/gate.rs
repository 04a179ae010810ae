//! Quantum gate types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard gates with known semantics.
///
/// Rotation angles are plain `f64` values: the variational loop rebuilds the
/// circuit for every parameter vector instead of binding symbols.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Pauli-X gate.
    X,
    /// Hadamard gate.
    H,
    /// Rotation around Y axis, `exp(-iθY/2)`.
    Ry(f64),
    /// Rotation around Z axis, `exp(-iθZ/2)`.
    Rz(f64),
    /// Controlled-X (CNOT) gate. Operands are `[control, target]`.
    CX,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::H => "h",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
        }
    }

    /// Number of qubits the gate acts on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::X | StandardGate::H | StandardGate::Ry(_) | StandardGate::Rz(_) => 1,
            StandardGate::CX => 2,
        }
    }

    /// The rotation angle, if the gate is parameterized.
    #[inline]
    pub fn parameter(&self) -> Option<f64> {
        match self {
            StandardGate::Ry(theta) | StandardGate::Rz(theta) => Some(*theta),
            StandardGate::X | StandardGate::H | StandardGate::CX => None,
        }
    }

    /// Check if this gate carries a rotation angle.
    #[inline]
    pub fn is_parameterized(&self) -> bool {
        self.parameter().is_some()
    }

    /// Label used by the text drawer, e.g. `RY(0.52)`.
    pub fn label(&self, precision: usize) -> String {
        match self.parameter() {
            Some(theta) => format!("{}({theta:.precision$})", self.name().to_uppercase()),
            None => self.name().to_uppercase(),
        }
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parameter() {
            Some(theta) => write!(f, "{}({theta})", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}

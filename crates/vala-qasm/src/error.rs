//! Error types for the QASM emitter.

use thiserror::Error;

/// Errors that can occur while emitting QASM.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QasmError {
    /// The circuit has no qubits, so no register can be declared.
    #[error("Cannot emit circuit '{0}': it has no qubits")]
    EmptyRegister(String),

    /// Rotation angle cannot be written as a QASM literal.
    #[error("Gate '{gate}' has angle {value} which has no QASM literal")]
    InvalidParameter { gate: String, value: f64 },
}

/// Result type for emitter operations.
pub type QasmResult<T> = Result<T, QasmError>;

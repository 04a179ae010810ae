//! Error types for the solver.

use thiserror::Error;

/// Errors that can occur while setting up, training or decoding.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SolverError {
    /// The classical system does not satisfy `A·x = b`, or shapes disagree.
    #[error("Inconsistent linear system: {0}")]
    Inconsistent(String),

    /// A matrix that must be Hermitian is not.
    #[error("Matrix '{0}' should be hermitian")]
    NotHermitian(String),

    /// A matrix that must be unitary is not.
    #[error("Matrix '{0}' should be unitary")]
    NotUnitary(String),

    /// The scaling-indicator amplitude is too small to rescale by.
    #[error("Scaling indicator amplitude {value:.3e} vanishes; cannot decode the solution")]
    VanishingIndicator { value: f64 },

    /// Parameter vector length does not match the ansatz.
    #[error("Ansatz '{ansatz}' expects {expected} parameters, got {got}")]
    ParameterCount {
        ansatz: String,
        expected: usize,
        got: usize,
    },

    /// The ansatz family cannot be built at this width.
    #[error("Ansatz '{ansatz}' does not support {num_qubits} qubits: {reason}")]
    UnsupportedAnsatz {
        ansatz: String,
        num_qubits: usize,
        reason: String,
    },

    /// An eigenvalue or singular value computation failed.
    #[error("Matrix decomposition failed: {0}")]
    Decomposition(String),

    /// A vector or matrix has the wrong dimension.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Configuration rejected by validation or parsing.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] vala_ir::IrError),

    /// Simulation failed.
    #[error("Simulation error: {0}")]
    Sim(#[from] vala_sim::SimError),

    /// QASM export failed.
    #[error("QASM export error: {0}")]
    Qasm(#[from] vala_qasm::QasmError),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

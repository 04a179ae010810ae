//! Error types for the simulator.

use thiserror::Error;

/// Errors that can occur during simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Circuit is wider than the simulator allows.
    #[error("Circuit too large: {requested} qubits, simulator supports up to {max}")]
    TooManyQubits { requested: usize, max: u32 },

    /// Sampling was requested with zero shots.
    #[error("Shot count must be positive")]
    ZeroShots,

    /// Amplitude vector length is not a power of two.
    #[error("Amplitude vector of length {0} is not a power of two")]
    InvalidDimension(usize),

    /// State has zero norm and cannot be sampled.
    #[error("State has zero norm")]
    ZeroNorm,
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;

//! Simulator front end.

use rand::Rng;
use std::time::Instant;
use tracing::{debug, instrument};

use vala_ir::Circuit;

use crate::counts::Counts;
use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Local statevector simulator.
///
/// Supports circuits up to ~20 qubits by default (limited by memory).
#[derive(Debug, Clone)]
pub struct Simulator {
    /// Maximum number of qubits supported.
    max_qubits: u32,
}

impl Simulator {
    /// Create a new simulator with default settings.
    pub fn new() -> Self {
        Self { max_qubits: 20 }
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self { max_qubits }
    }

    /// Maximum circuit width accepted.
    pub fn max_qubits(&self) -> u32 {
        self.max_qubits
    }

    fn check_size(&self, circuit: &Circuit) -> SimResult<()> {
        if circuit.num_qubits() > self.max_qubits as usize {
            return Err(SimError::TooManyQubits {
                requested: circuit.num_qubits(),
                max: self.max_qubits,
            });
        }
        Ok(())
    }

    /// Evolve |0...0⟩ through the circuit and return the exact final state.
    #[instrument(level = "trace", skip(self, circuit), fields(name = circuit.name()))]
    pub fn state(&self, circuit: &Circuit) -> SimResult<Statevector> {
        self.check_size(circuit)?;
        let mut sv = Statevector::new(circuit.num_qubits());
        sv.run(circuit)?;
        Ok(sv)
    }

    /// Prepare the state once and draw `shots` basis-state samples from it.
    #[instrument(skip(self, circuit, rng), fields(name = circuit.name()))]
    pub fn sample<R: Rng>(
        &self,
        circuit: &Circuit,
        shots: u32,
        rng: &mut R,
    ) -> SimResult<Counts> {
        if shots == 0 {
            return Err(SimError::ZeroShots);
        }
        let start = Instant::now();
        let sv = self.state(circuit)?;
        if sv.norm_sqr() == 0.0 {
            return Err(SimError::ZeroNorm);
        }
        debug!(
            "Sampling {} shots from {} qubits ({} instructions)",
            shots,
            circuit.num_qubits(),
            circuit.num_ops()
        );

        let counts: Counts = (0..shots).map(|_| sv.sample(rng)).collect();

        debug!("Sampling completed in {:?}", start.elapsed());
        Ok(counts)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

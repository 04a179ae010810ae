//! End-to-end solve: configuration in, trained circuit and report out.

use std::path::Path;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use vala_ir::Circuit;
use vala_sim::{Counts, Simulator};

use crate::circuits::Ansatz;
use crate::config::SolverConfig;
use crate::error::{SolverError, SolverResult};
use crate::linalg::{condition_number, spectral_norm};
use crate::problems::{Hamiltonian, NormalizedSystem, PauliHamiltonian};
use crate::report::{
    AnsatzSummary, ArtifactPaths, RunReport, SystemSummary, write_loss_csv, write_loss_svg,
    write_qasm,
};
use crate::runners::{TrainingStep, VqaRunner, pmeasure, qmeasure};

/// A configured problem, ready to train.
#[derive(Debug, Clone)]
pub struct Problem {
    config: SolverConfig,
    system: NormalizedSystem,
    hamiltonian: Hamiltonian,
    pauli: PauliHamiltonian,
    ansatz: Ansatz,
}

impl Problem {
    /// Build the system, Hamiltonian and ansatz described by `config`.
    pub fn from_config(config: &SolverConfig) -> SolverResult<Self> {
        config.validate()?;
        let system = config.to_system()?.preprocess(config.hermitize)?;
        let hamiltonian = Hamiltonian::from_system(&system)?;
        let pauli = hamiltonian.decompose()?;
        let ansatz = Ansatz::new(config.ansatz, system.num_qubits(), config.depth)?;
        info!(
            "Prepared {}-qubit problem: {} Pauli terms, {} ansatz with {} parameters",
            system.num_qubits(),
            pauli.num_terms(),
            ansatz.kind(),
            ansatz.num_parameters()
        );
        Ok(Self {
            config: config.clone(),
            system,
            hamiltonian,
            pauli,
            ansatz,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The embedded, normalized system.
    pub fn system(&self) -> &NormalizedSystem {
        &self.system
    }

    /// Dense `H_A`.
    pub fn hamiltonian(&self) -> &Hamiltonian {
        &self.hamiltonian
    }

    /// Pauli decomposition of `H_A`, used for training.
    pub fn pauli(&self) -> &PauliHamiltonian {
        &self.pauli
    }

    /// The ansatz bound to the system width.
    pub fn ansatz(&self) -> &Ansatz {
        &self.ansatz
    }

    /// Training runner configured from the problem's settings.
    pub fn runner(&self) -> SolverResult<VqaRunner> {
        let c = &self.config;
        Ok(VqaRunner::new(self.pauli.clone(), self.ansatz)?
            .with_optimizer(c.optimizer, c.lr)
            .with_iters(c.iters)
            .with_log_every(c.log_every)
            .with_tolerance(c.tolerance)
            .with_gradient(c.gradient)
            .with_init(c.init, c.seed))
    }

    /// Norm, conditioning and encoding fidelity of the normalized system.
    pub fn summary(&self) -> SolverResult<SystemSummary> {
        let a = self.system.a();
        let kappa = condition_number(a)?;
        Ok(SystemSummary {
            original_dim: self.system.target().len(),
            dim: self.system.dim(),
            num_qubits: self.system.num_qubits(),
            hermitized: self.system.is_hermitized(),
            a_norm: spectral_norm(a)?,
            a_condition: kappa.is_finite().then_some(kappa),
            encoding_fidelity: self.system.encoding_fidelity()?,
        })
    }

    /// Train, read out both ways and assemble the report.
    pub fn solve<F>(&self, callback: F) -> SolverResult<Solution>
    where
        F: FnMut(&TrainingStep),
    {
        let training = self.runner()?.run_with_callback(callback)?;
        let circuit = self.ansatz.build(&training.optimal_params)?;
        let simulator = Simulator::new();

        let exact = pmeasure(&simulator, &circuit, &self.system)?;
        info!(
            "Exact readout: fidelity {:.6}, L1 error {:.6}",
            exact.fidelity, exact.l1_error
        );

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let (sampled, counts) =
            match qmeasure(&simulator, &circuit, &self.system, self.config.shots, &mut rng) {
                Ok((report, counts)) => {
                    info!(
                        "Sampled readout: fidelity {:.6}, L1 error {:.6}",
                        report.fidelity, report.l1_error
                    );
                    (Some(report), Some(counts))
                }
                Err(SolverError::VanishingIndicator { value }) => {
                    warn!("Sampled readout skipped: indicator amplitude {value:.3e}");
                    (None, None)
                }
                Err(e) => return Err(e),
            };

        let ansatz = AnsatzSummary {
            kind: self.ansatz.kind().name().to_string(),
            num_parameters: self.ansatz.num_parameters(),
            depth: circuit.depth(),
            num_ops: circuit.num_ops(),
            num_entangling_gates: circuit.num_entangling_gates(),
        };
        let report = RunReport {
            created_at: Utc::now(),
            config: self.config.clone(),
            system: self.summary()?,
            hamiltonian: self.pauli.clone(),
            ansatz,
            training,
            exact,
            sampled,
        };
        Ok(Solution {
            report,
            circuit,
            counts,
        })
    }
}

/// Output of [`Problem::solve`].
#[derive(Debug, Clone)]
pub struct Solution {
    /// Summary of the run, as written to `<stem>.json`.
    pub report: RunReport,
    /// The trained circuit.
    pub circuit: Circuit,
    /// Raw shot counts of the sampled readout.
    pub counts: Option<Counts>,
}

impl Solution {
    /// Write report, loss curve and circuit under `dir`, creating it if needed.
    pub fn write_artifacts(&self, dir: &Path, stem: &str) -> SolverResult<ArtifactPaths> {
        std::fs::create_dir_all(dir)?;
        let paths = ArtifactPaths::new(dir, stem);
        self.report.save_json(&paths.report)?;
        write_loss_csv(&paths.loss_csv, &self.report.training.loss_history)?;
        write_loss_svg(&paths.loss_svg, &self.report.training.loss_history)?;
        write_qasm(&paths.qasm, &self.circuit)?;
        Ok(paths)
    }
}

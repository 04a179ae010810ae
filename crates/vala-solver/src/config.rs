//! Solver configuration.
//!
//! Values are layered, lowest precedence first:
//! 1. Built-in defaults
//! 2. A YAML configuration file
//! 3. Environment variables with the `VALA_` prefix
//!
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::circuits::AnsatzKind;
use crate::error::{SolverError, SolverResult};
use crate::gradient::GradientMethod;
use crate::optimizers::OptimizerKind;
use crate::problems::LinearSystem;
use crate::runners::InitStrategy;

/// Complete solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Ansatz family
    #[serde(default = "default_ansatz")]
    pub ansatz: AnsatzKind,

    /// Number of entangling layers
    #[serde(default = "default_depth")]
    pub depth: usize,

    /// Shots for the sampled readout
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Optimizer step size
    #[serde(default = "default_lr")]
    pub lr: f64,

    /// Optimizer steps
    #[serde(default = "default_iters")]
    pub iters: usize,

    /// Optimizer family
    #[serde(default = "default_optimizer")]
    pub optimizer: OptimizerKind,

    /// Seed for sampling and random initialization
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Directory for reports, loss curves and circuits
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Log the loss every this many steps
    #[serde(default = "default_log_every")]
    pub log_every: usize,

    /// Early-stopping tolerance on |Δloss| (0 disables)
    #[serde(default)]
    pub tolerance: f64,

    /// Initial parameters
    #[serde(default)]
    pub init: InitStrategy,

    /// Gradient method
    #[serde(default)]
    pub gradient: GradientMethod,

    /// Use the hermitized embedding
    #[serde(default)]
    pub hermitize: bool,

    /// Linear system to solve; the reference system when absent
    #[serde(default)]
    pub system: Option<SystemSpec>,
}

/// A linear system written out in a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSpec {
    /// Row-major coefficient matrix
    pub a: Vec<Vec<f64>>,
    /// Right-hand side
    pub b: Vec<f64>,
    /// Known solution
    pub x: Vec<f64>,
}

fn default_ansatz() -> AnsatzKind {
    AnsatzKind::Simple
}

fn default_depth() -> usize {
    1
}

fn default_shots() -> u32 {
    10_000
}

fn default_lr() -> f64 {
    0.8
}

fn default_iters() -> usize {
    500
}

fn default_optimizer() -> OptimizerKind {
    OptimizerKind::Momentum
}

fn default_seed() -> u64 {
    1024
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("log")
}

fn default_log_every() -> usize {
    10
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            ansatz: default_ansatz(),
            depth: default_depth(),
            shots: default_shots(),
            lr: default_lr(),
            iters: default_iters(),
            optimizer: default_optimizer(),
            seed: default_seed(),
            output_dir: default_output_dir(),
            log_every: default_log_every(),
            tolerance: 0.0,
            init: InitStrategy::default(),
            gradient: GradientMethod::default(),
            hermitize: false,
            system: None,
        }
    }
}

fn env_override<T: FromStr>(name: &str, slot: &mut T) {
    if let Ok(raw) = std::env::var(name) {
        match raw.parse() {
            Ok(value) => *slot = value,
            Err(_) => warn!("Ignoring {name}={raw}: cannot parse value"),
        }
    }
}

impl SolverConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(contents: &str) -> SolverResult<Self> {
        let config: SolverConfig = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SolverResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn load(config_file: Option<&Path>) -> SolverResult<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `VALA_*` environment variables. Unparseable values are ignored.
    pub fn merge_env(mut self) -> Self {
        env_override("VALA_ANSATZ", &mut self.ansatz);
        env_override("VALA_DEPTH", &mut self.depth);
        env_override("VALA_SHOTS", &mut self.shots);
        env_override("VALA_LR", &mut self.lr);
        env_override("VALA_ITERS", &mut self.iters);
        env_override("VALA_OPTIMIZER", &mut self.optimizer);
        env_override("VALA_SEED", &mut self.seed);
        env_override("VALA_LOG_EVERY", &mut self.log_every);
        env_override("VALA_TOLERANCE", &mut self.tolerance);
        env_override("VALA_INIT", &mut self.init);
        env_override("VALA_GRADIENT", &mut self.gradient);
        env_override("VALA_HERMITIZE", &mut self.hermitize);
        if let Ok(dir) = std::env::var("VALA_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> SolverResult<()> {
        let invalid = |msg: String| Err(SolverError::InvalidConfig(msg));

        if self.iters == 0 {
            return invalid("iters must be greater than 0".to_string());
        }
        if !self.lr.is_finite() || self.lr <= 0.0 {
            return invalid(format!("lr must be a positive number, got {}", self.lr));
        }
        if self.shots == 0 {
            return invalid("shots must be greater than 0".to_string());
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return invalid(format!("tolerance must be non-negative, got {}", self.tolerance));
        }
        if self.ansatz.fixed_width().is_none() && self.depth == 0 {
            return invalid(format!("ansatz '{}' needs depth ≥ 1", self.ansatz));
        }
        if let Some(spec) = &self.system {
            let m = spec.a.len();
            if m == 0 || spec.a.iter().any(|row| row.len() != m) {
                return invalid("system.a must be a non-empty square matrix".to_string());
            }
            if spec.b.len() != m || spec.x.len() != m {
                return invalid(format!(
                    "system.b and system.x must have {m} entries, got {} and {}",
                    spec.b.len(),
                    spec.x.len()
                ));
            }
        }
        Ok(())
    }

    /// The configured linear system, or the reference one.
    pub fn to_system(&self) -> SolverResult<LinearSystem> {
        match &self.system {
            Some(spec) => LinearSystem::from_rows(&spec.a, spec.b.clone(), spec.x.clone()),
            None => Ok(LinearSystem::reference()),
        }
    }
}

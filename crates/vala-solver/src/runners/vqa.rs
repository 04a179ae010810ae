//! Variational training loop.
//!
//! The loss is `⟨ψ(θ)|H_A|ψ(θ)⟩` evaluated on the exact simulator state and
//! the Pauli decomposition of `H_A`. Parameters start at zero (or a seeded
//! uniform draw), and each iteration takes one gradient, one optimizer step
//! and one fresh loss evaluation.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vala_sim::Simulator;

use crate::circuits::Ansatz;
use crate::error::{SolverError, SolverResult};
use crate::gradient::GradientMethod;
use crate::optimizers::OptimizerKind;
use crate::problems::PauliHamiltonian;

/// How the initial parameter vector is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStrategy {
    /// All zeros.
    #[default]
    Zeros,
    /// Uniform in `[-π, π)` from a seeded generator.
    Random,
}

impl InitStrategy {
    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            InitStrategy::Zeros => "zeros",
            InitStrategy::Random => "random",
        }
    }
}

impl fmt::Display for InitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InitStrategy {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zeros" | "zero" => Ok(InitStrategy::Zeros),
            "random" | "rand" => Ok(InitStrategy::Random),
            other => Err(SolverError::InvalidConfig(format!(
                "unknown init strategy '{other}' (expected zeros or random)"
            ))),
        }
    }
}

/// Progress of one training iteration, handed to callbacks.
#[derive(Debug, Clone)]
pub struct TrainingStep {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Total iteration budget.
    pub total: usize,
    /// Loss after the step.
    pub loss: f64,
    /// Euclidean norm of the gradient that produced the step.
    pub gradient_norm: f64,
}

/// Result of a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Loss at `θ₀` followed by the loss after every step.
    pub loss_history: Vec<f64>,
    /// Parameters at `θ₀` followed by the parameters after every step.
    pub param_history: Vec<Vec<f64>>,
    /// Parameters after the last step.
    pub optimal_params: Vec<f64>,
    /// Loss at `optimal_params`.
    pub final_loss: f64,
    /// Number of steps taken.
    pub iterations: usize,
    /// Whether the run stopped on the loss tolerance.
    pub converged: bool,
}

impl TrainingResult {
    /// Loss before training.
    pub fn initial_loss(&self) -> f64 {
        self.loss_history.first().copied().unwrap_or(self.final_loss)
    }
}

/// VQA runner configuration.
#[derive(Debug, Clone)]
pub struct VqaRunner {
    hamiltonian: PauliHamiltonian,
    ansatz: Ansatz,
    simulator: Simulator,
    /// Optimizer family.
    pub optimizer: OptimizerKind,
    /// Optimizer step size.
    pub stepsize: f64,
    /// Maximum number of optimizer steps.
    pub iters: usize,
    /// Log the loss every this many steps (0 disables).
    pub log_every: usize,
    /// Stop when the loss changes by less than this (0 disables).
    pub tolerance: f64,
    /// Gradient evaluation method.
    pub gradient: GradientMethod,
    /// Initial parameter strategy.
    pub init: InitStrategy,
    /// Seed for [`InitStrategy::Random`].
    pub seed: u64,
}

impl VqaRunner {
    /// Create a runner minimizing `hamiltonian` over `ansatz`.
    pub fn new(hamiltonian: PauliHamiltonian, ansatz: Ansatz) -> SolverResult<Self> {
        if hamiltonian.num_qubits() > ansatz.num_qubits() {
            return Err(SolverError::DimensionMismatch {
                expected: hamiltonian.num_qubits(),
                got: ansatz.num_qubits(),
            });
        }
        Ok(Self {
            hamiltonian,
            ansatz,
            simulator: Simulator::new(),
            optimizer: OptimizerKind::Momentum,
            stepsize: 0.8,
            iters: 500,
            log_every: 10,
            tolerance: 0.0,
            gradient: GradientMethod::ParameterShift,
            init: InitStrategy::Zeros,
            seed: 1024,
        })
    }

    /// Set the optimizer family and step size.
    pub fn with_optimizer(mut self, optimizer: OptimizerKind, stepsize: f64) -> Self {
        self.optimizer = optimizer;
        self.stepsize = stepsize;
        self
    }

    /// Set the iteration budget.
    pub fn with_iters(mut self, iters: usize) -> Self {
        self.iters = iters;
        self
    }

    /// Set the logging interval.
    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    /// Set the early-stopping tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the gradient method.
    pub fn with_gradient(mut self, gradient: GradientMethod) -> Self {
        self.gradient = gradient;
        self
    }

    /// Set the initialization strategy and seed.
    pub fn with_init(mut self, init: InitStrategy, seed: u64) -> Self {
        self.init = init;
        self.seed = seed;
        self
    }

    /// Use a custom simulator.
    pub fn with_simulator(mut self, simulator: Simulator) -> Self {
        self.simulator = simulator;
        self
    }

    /// The ansatz being trained.
    pub fn ansatz(&self) -> &Ansatz {
        &self.ansatz
    }

    /// The objective Hamiltonian.
    pub fn hamiltonian(&self) -> &PauliHamiltonian {
        &self.hamiltonian
    }

    /// Number of trainable parameters.
    pub fn num_parameters(&self) -> usize {
        self.ansatz.num_parameters()
    }

    /// `θ₀` according to the initialization strategy.
    pub fn initial_params(&self) -> Vec<f64> {
        let n = self.num_parameters();
        match self.init {
            InitStrategy::Zeros => vec![0.0; n],
            InitStrategy::Random => {
                let mut rng = StdRng::seed_from_u64(self.seed);
                (0..n).map(|_| rng.gen_range(-PI..PI)).collect()
            }
        }
    }

    /// Loss `⟨ψ(θ)|H_A|ψ(θ)⟩`.
    pub fn loss(&self, params: &[f64]) -> SolverResult<f64> {
        let circuit = self.ansatz.build(params)?;
        let state = self.simulator.state(&circuit)?;
        Ok(self.hamiltonian.expectation(state.amplitudes()))
    }

    /// Train from [`VqaRunner::initial_params`].
    pub fn run(&self) -> SolverResult<TrainingResult> {
        self.run_with_callback(|_| {})
    }

    /// Train, calling `callback` after every step.
    pub fn run_with_callback<F>(&self, callback: F) -> SolverResult<TrainingResult>
    where
        F: FnMut(&TrainingStep),
    {
        self.run_from(self.initial_params(), callback)
    }

    /// Train from explicit initial parameters.
    pub fn run_from<F>(
        &self,
        initial_params: Vec<f64>,
        mut callback: F,
    ) -> SolverResult<TrainingResult>
    where
        F: FnMut(&TrainingStep),
    {
        let expected = self.num_parameters();
        if initial_params.len() != expected {
            return Err(SolverError::ParameterCount {
                ansatz: self.ansatz.kind().name().to_string(),
                expected,
                got: initial_params.len(),
            });
        }

        let mut optimizer = self.optimizer.build(self.stepsize);
        let mut params = initial_params;
        let mut loss = self.loss(&params)?;
        let mut loss_history = vec![loss];
        let mut param_history = vec![params.clone()];
        let mut converged = false;
        let mut iterations = 0;

        info!(
            "Training {} ansatz ({} params) with {} (lr={}) for {} iterations",
            self.ansatz.kind(),
            expected,
            optimizer.name(),
            self.stepsize,
            self.iters
        );

        for i in 0..self.iters {
            let gradient = self.gradient.gradient(|p| self.loss(p), &params)?;
            params = optimizer.step(&params, &gradient);
            let next = self.loss(&params)?;
            iterations = i + 1;

            let gradient_norm = gradient.iter().map(|g| g * g).sum::<f64>().sqrt();
            debug!(iteration = iterations, loss = next, gradient_norm, "step");
            callback(&TrainingStep {
                iteration: iterations,
                total: self.iters,
                loss: next,
                gradient_norm,
            });
            if self.log_every > 0 && i % self.log_every == 0 {
                info!("[{}/{}] loss: {}", i, self.iters, next);
            }

            let delta = (next - loss).abs();
            loss = next;
            loss_history.push(loss);
            param_history.push(params.clone());

            if self.tolerance > 0.0 && delta < self.tolerance {
                info!("Converged after {} iterations (|Δloss| = {:.3e})", iterations, delta);
                converged = true;
                break;
            }
        }

        info!("final loss: {}", loss);
        Ok(TrainingResult {
            loss_history,
            param_history,
            optimal_params: params,
            final_loss: loss,
            iterations,
            converged,
        })
    }
}

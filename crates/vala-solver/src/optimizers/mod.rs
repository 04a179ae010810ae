//! Classical optimizers for the variational loop.
//!
//! Each optimizer consumes the current parameters and gradient and returns
//! the next parameter vector. Internal state (velocity, moment estimates)
//! lives in the optimizer and is cleared by [`Optimizer::reset`].

pub mod adam;
pub mod gradient_descent;
pub mod momentum;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;

pub use adam::Adam;
pub use gradient_descent::GradientDescent;
pub use momentum::Momentum;

/// Trait for gradient-based optimizers.
pub trait Optimizer {
    /// Take one step given the current parameters and their gradient.
    fn step(&mut self, params: &[f64], gradient: &[f64]) -> Vec<f64>;

    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Forget accumulated state.
    fn reset(&mut self);
}

/// Optimizer selection, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    /// Heavy-ball momentum, `m = 0.9`.
    Momentum,
    /// Plain gradient descent.
    GradientDescent,
    /// Adam with `β₁ = 0.9`, `β₂ = 0.99`.
    Adam,
}

impl OptimizerKind {
    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            OptimizerKind::Momentum => "momentum",
            OptimizerKind::GradientDescent => "gradient_descent",
            OptimizerKind::Adam => "adam",
        }
    }

    /// Instantiate with the given step size and default hyper-parameters.
    pub fn build(&self, stepsize: f64) -> Box<dyn Optimizer> {
        match self {
            OptimizerKind::Momentum => Box::new(Momentum::new(stepsize)),
            OptimizerKind::GradientDescent => Box::new(GradientDescent::new(stepsize)),
            OptimizerKind::Adam => Box::new(Adam::new(stepsize)),
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptimizerKind {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "momentum" => Ok(OptimizerKind::Momentum),
            "gradient_descent" | "gd" | "sgd" => Ok(OptimizerKind::GradientDescent),
            "adam" => Ok(OptimizerKind::Adam),
            other => Err(SolverError::InvalidConfig(format!(
                "unknown optimizer '{other}' (expected momentum, gradient_descent or adam)"
            ))),
        }
    }
}

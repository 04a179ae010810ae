//! Gradient descent with momentum.

use super::Optimizer;

/// Heavy-ball momentum.
///
/// The accumulator follows `a ← m·a + η·g` and the update is `θ ← θ − a`.
#[derive(Debug, Clone)]
pub struct Momentum {
    /// Step size `η`.
    pub stepsize: f64,
    /// Momentum coefficient `m`.
    pub momentum: f64,
    accumulation: Vec<f64>,
}

impl Momentum {
    /// Create with the given step size and `m = 0.9`.
    pub fn new(stepsize: f64) -> Self {
        Self {
            stepsize,
            momentum: 0.9,
            accumulation: Vec::new(),
        }
    }

    /// Set the momentum coefficient.
    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }
}

impl Optimizer for Momentum {
    fn step(&mut self, params: &[f64], gradient: &[f64]) -> Vec<f64> {
        if self.accumulation.len() != params.len() {
            self.accumulation = vec![0.0; params.len()];
        }
        for (a, g) in self.accumulation.iter_mut().zip(gradient) {
            *a = self.momentum * *a + self.stepsize * g;
        }
        params
            .iter()
            .zip(&self.accumulation)
            .map(|(p, a)| p - a)
            .collect()
    }

    fn name(&self) -> &'static str {
        "momentum"
    }

    fn reset(&mut self) {
        self.accumulation.clear();
    }
}

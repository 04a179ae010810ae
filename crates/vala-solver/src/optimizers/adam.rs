//! Adam optimizer.

use super::Optimizer;

/// Adaptive moment estimation.
///
/// Bias correction is folded into the step size:
/// `η_t = η·sqrt(1 − β₂ᵗ) / (1 − β₁ᵗ)`, then `θ ← θ − η_t·m / (sqrt(v) + ε)`.
#[derive(Debug, Clone)]
pub struct Adam {
    /// Step size `η`.
    pub stepsize: f64,
    /// First-moment decay `β₁`.
    pub beta1: f64,
    /// Second-moment decay `β₂`.
    pub beta2: f64,
    /// Numerical floor `ε`.
    pub eps: f64,
    first_moment: Vec<f64>,
    second_moment: Vec<f64>,
    t: i32,
}

impl Adam {
    /// Create with `β₁ = 0.9`, `β₂ = 0.99`, `ε = 1e-8`.
    pub fn new(stepsize: f64) -> Self {
        Self {
            stepsize,
            beta1: 0.9,
            beta2: 0.99,
            eps: 1e-8,
            first_moment: Vec::new(),
            second_moment: Vec::new(),
            t: 0,
        }
    }

    /// Set the moment decay rates.
    pub fn with_betas(mut self, beta1: f64, beta2: f64) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &[f64], gradient: &[f64]) -> Vec<f64> {
        if self.first_moment.len() != params.len() {
            self.first_moment = vec![0.0; params.len()];
            self.second_moment = vec![0.0; params.len()];
            self.t = 0;
        }
        self.t += 1;

        let lr_t = self.stepsize * (1.0 - self.beta2.powi(self.t)).sqrt()
            / (1.0 - self.beta1.powi(self.t));

        params
            .iter()
            .zip(gradient)
            .enumerate()
            .map(|(i, (p, g))| {
                self.first_moment[i] = self.beta1 * self.first_moment[i] + (1.0 - self.beta1) * g;
                self.second_moment[i] =
                    self.beta2 * self.second_moment[i] + (1.0 - self.beta2) * g * g;
                p - lr_t * self.first_moment[i] / (self.second_moment[i].sqrt() + self.eps)
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "adam"
    }

    fn reset(&mut self) {
        self.first_moment.clear();
        self.second_moment.clear();
        self.t = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_step_is_sign_times_stepsize() {
        // With bias correction the first step has magnitude ≈ η regardless of |g|.
        let mut opt = Adam::new(0.01);
        let p = opt.step(&[0.0, 0.0], &[250.0, -0.003]);
        assert_relative_eq!(p[0], -0.01, epsilon = 1e-6);
        assert_relative_eq!(p[1], 0.01, epsilon = 1e-4);
    }

    #[test]
    fn test_reset_restarts_bias_correction() {
        let mut opt = Adam::new(0.1).with_betas(0.8, 0.95);
        opt.step(&[0.0], &[1.0]);
        opt.step(&[0.0], &[1.0]);
        opt.reset();
        let p = opt.step(&[0.0], &[1.0]);
        assert_relative_eq!(p[0], -0.1, epsilon = 1e-6);
    }
}

//! Vanilla gradient descent.

use super::Optimizer;

/// `θ ← θ − η·g`.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    /// Step size `η`.
    pub stepsize: f64,
}

impl GradientDescent {
    /// Create with the given step size.
    pub fn new(stepsize: f64) -> Self {
        Self { stepsize }
    }
}

impl Optimizer for GradientDescent {
    fn step(&mut self, params: &[f64], gradient: &[f64]) -> Vec<f64> {
        params
            .iter()
            .zip(gradient)
            .map(|(p, g)| p - self.stepsize * g)
            .collect()
    }

    fn name(&self) -> &'static str {
        "gradient_descent"
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step() {
        let mut opt = GradientDescent::new(0.5);
        assert_eq!(opt.step(&[1.0, 2.0], &[2.0, -4.0]), vec![0.0, 4.0]);
    }
}

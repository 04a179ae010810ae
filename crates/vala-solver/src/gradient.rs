//! Gradients of the variational objective.
//!
//! For a rotation `U(θ) = exp(-iθG/2)` with generator eigenvalues `±1`
//! (every `RY`/`RZ` in the ansatz), the parameter-shift rule is exact:
//!
//! ∂E/∂θᵢ = [E(θ + π/2·eᵢ) − E(θ − π/2·eᵢ)] / 2
//!
//! A central finite difference is kept for cross-checking.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};

/// Shift used by the parameter-shift rule.
pub const PARAMETER_SHIFT: f64 = std::f64::consts::FRAC_PI_2;

/// Step used by the central finite difference.
pub const FINITE_DIFFERENCE_STEP: f64 = 1e-6;

/// How gradients are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientMethod {
    /// Exact two-term parameter shift.
    #[default]
    ParameterShift,
    /// Central finite difference with step `1e-6`.
    FiniteDifference,
}

impl GradientMethod {
    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            GradientMethod::ParameterShift => "parameter_shift",
            GradientMethod::FiniteDifference => "finite_difference",
        }
    }

    /// Evaluate the gradient of `objective` at `params`.
    pub fn gradient<F>(&self, objective: F, params: &[f64]) -> SolverResult<Vec<f64>>
    where
        F: FnMut(&[f64]) -> SolverResult<f64>,
    {
        match self {
            GradientMethod::ParameterShift => parameter_shift(objective, params),
            GradientMethod::FiniteDifference => {
                finite_difference(objective, params, FINITE_DIFFERENCE_STEP)
            }
        }
    }
}

impl fmt::Display for GradientMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GradientMethod {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "parameter_shift" | "param_shift" | "ps" => Ok(GradientMethod::ParameterShift),
            "finite_difference" | "fd" => Ok(GradientMethod::FiniteDifference),
            other => Err(SolverError::InvalidConfig(format!(
                "unknown gradient method '{other}'"
            ))),
        }
    }
}

fn symmetric_difference<F>(mut objective: F, params: &[f64], shift: f64) -> SolverResult<Vec<f64>>
where
    F: FnMut(&[f64]) -> SolverResult<f64>,
{
    let mut shifted = params.to_vec();
    let mut gradient = Vec::with_capacity(params.len());
    for i in 0..params.len() {
        shifted[i] = params[i] + shift;
        let plus = objective(&shifted)?;
        shifted[i] = params[i] - shift;
        let minus = objective(&shifted)?;
        shifted[i] = params[i];
        gradient.push(plus - minus);
    }
    Ok(gradient)
}

/// Parameter-shift gradient, two objective evaluations per parameter.
pub fn parameter_shift<F>(objective: F, params: &[f64]) -> SolverResult<Vec<f64>>
where
    F: FnMut(&[f64]) -> SolverResult<f64>,
{
    let raw = symmetric_difference(objective, params, PARAMETER_SHIFT)?;
    Ok(raw.into_iter().map(|d| d / 2.0).collect())
}

/// Central finite-difference gradient with step `h`.
pub fn finite_difference<F>(objective: F, params: &[f64], h: f64) -> SolverResult<Vec<f64>>
where
    F: FnMut(&[f64]) -> SolverResult<f64>,
{
    let raw = symmetric_difference(objective, params, h)?;
    Ok(raw.into_iter().map(|d| d / (2.0 * h)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parameter_shift_is_exact_for_sinusoids() {
        // E(θ) = cos θ₀ + 0.5·sin θ₁ has exactly the parameter-shift structure.
        let objective = |p: &[f64]| Ok(p[0].cos() + 0.5 * p[1].sin());
        let params = [0.3, -1.1];
        let grad = parameter_shift(objective, &params).unwrap();
        assert_relative_eq!(grad[0], -(0.3_f64).sin(), epsilon = 1e-12);
        assert_relative_eq!(grad[1], 0.5 * (-1.1_f64).cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_finite_difference_on_polynomial() {
        let objective = |p: &[f64]| Ok(p[0] * p[0] + 3.0 * p[1]);
        let grad = finite_difference(objective, &[2.0, 0.0], 1e-6).unwrap();
        assert_relative_eq!(grad[0], 4.0, epsilon = 1e-6);
        assert_relative_eq!(grad[1], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_errors_propagate() {
        let objective = |_: &[f64]| Err(SolverError::InvalidConfig("boom".into()));
        assert!(GradientMethod::ParameterShift.gradient(objective, &[0.0]).is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "param-shift".parse::<GradientMethod>().unwrap(),
            GradientMethod::ParameterShift
        );
        assert_eq!(
            "fd".parse::<GradientMethod>().unwrap(),
            GradientMethod::FiniteDifference
        );
        assert!("adjoint".parse::<GradientMethod>().is_err());
    }
}

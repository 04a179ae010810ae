//! Reading the trained state back out as a classical solution.
//!
//! `pmeasure` uses the exact amplitudes, `qmeasure` estimates them from shot
//! counts as `sqrt(p)`. Sampling loses the sign of every amplitude, so the
//! sampled decode is only meaningful for solutions with non-negative entries.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vala_ir::Circuit;
use vala_sim::{Counts, Simulator};

use crate::error::SolverResult;
use crate::linalg::to_complex_vector;
use crate::problems::NormalizedSystem;
use crate::state::fidelity;

/// Decoded readout of a trained circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementReport {
    /// Estimated real amplitudes `x̃` of length `N`.
    pub x_tilde: Vec<f64>,
    /// `|⟨x̃|x⟩|` against the normalized target.
    pub fidelity: f64,
    /// Decoded classical solution of length `m`.
    pub x_hat: Vec<f64>,
    /// Mean absolute error of `x_hat` against the classical solution.
    pub l1_error: f64,
}

impl MeasurementReport {
    /// Decode `x_tilde` through `system`.
    pub fn from_amplitudes(system: &NormalizedSystem, x_tilde: Vec<f64>) -> SolverResult<Self> {
        let fidelity = fidelity(&to_complex_vector(&x_tilde), system.x())?;
        let x_hat = system.postprocess(&x_tilde)?;
        let l1_error = system.l1_error(&x_hat);
        Ok(Self {
            x_tilde,
            fidelity,
            x_hat,
            l1_error,
        })
    }
}

/// Exact readout: real parts of the simulated state.
pub fn pmeasure(
    simulator: &Simulator,
    circuit: &Circuit,
    system: &NormalizedSystem,
) -> SolverResult<MeasurementReport> {
    let state = simulator.state(circuit)?;
    let x_tilde: Vec<f64> = state.amplitudes().iter().map(|z| z.re).collect();
    let max_imag = state
        .amplitudes()
        .iter()
        .map(|z| z.im.abs())
        .fold(0.0_f64, f64::max);
    if max_imag > 1e-6 {
        warn!("Discarding imaginary parts up to {max_imag:.3e} in the exact readout");
    }
    MeasurementReport::from_amplitudes(system, x_tilde)
}

/// Sampled readout: `x̃ = sqrt(counts / shots)` over all `N` outcomes.
///
/// Returns the raw counts alongside the report.
pub fn qmeasure<R: Rng>(
    simulator: &Simulator,
    circuit: &Circuit,
    system: &NormalizedSystem,
    shots: u32,
    rng: &mut R,
) -> SolverResult<(MeasurementReport, Counts)> {
    let counts = simulator.sample(circuit, shots, rng)?;
    debug!("Sampled {} distinct outcomes from {} shots", counts.len(), shots);
    let x_tilde: Vec<f64> = counts
        .probabilities(system.dim())
        .into_iter()
        .map(f64::sqrt)
        .collect();
    let report = MeasurementReport::from_amplitudes(system, x_tilde)?;
    Ok((report, counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;
    use crate::problems::LinearSystem;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use vala_ir::QubitId;

    /// A 1×1 system `2·x = 6` embeds into one qubit with `|x⟩ ∝ [3, 1]`.
    fn scalar_system() -> NormalizedSystem {
        LinearSystem::from_rows(&[vec![2.0]], vec![6.0], vec![3.0])
            .unwrap()
            .preprocess(false)
            .unwrap()
    }

    /// `RY(θ)|0⟩ = cos(θ/2)|0⟩ + sin(θ/2)|1⟩` with `tan(θ/2) = 1/3`.
    fn solution_circuit() -> Circuit {
        let theta = 2.0 * (1.0_f64 / 3.0).atan();
        let mut circuit = Circuit::with_size("solution", 1);
        circuit.ry(theta, QubitId(0)).unwrap();
        circuit
    }

    #[test]
    fn test_pmeasure_recovers_solution() {
        let system = scalar_system();
        let report = pmeasure(&Simulator::new(), &solution_circuit(), &system).unwrap();
        assert_relative_eq!(report.fidelity, 1.0, epsilon = 1e-12);
        assert_eq!(report.x_hat.len(), 1);
        assert_relative_eq!(report.x_hat[0], 3.0, epsilon = 1e-9);
        assert!(report.l1_error < 1e-9);
    }

    #[test]
    fn test_qmeasure_approximates_solution() {
        let system = scalar_system();
        let mut rng = StdRng::seed_from_u64(1024);
        let (report, counts) =
            qmeasure(&Simulator::new(), &solution_circuit(), &system, 20_000, &mut rng).unwrap();
        assert_eq!(counts.total(), 20_000);
        assert_eq!(report.x_tilde.len(), 2);
        assert!(report.fidelity > 0.999);
        assert!((report.x_hat[0] - 3.0).abs() < 0.3, "x_hat = {:?}", report.x_hat);
    }

    #[test]
    fn test_unseen_indicator_is_an_error() {
        // |0⟩ puts everything on the solution entry, nothing on the indicator.
        let system = scalar_system();
        let circuit = Circuit::with_size("idle", 1);
        let mut rng = StdRng::seed_from_u64(1);
        let err = qmeasure(&Simulator::new(), &circuit, &system, 100, &mut rng).unwrap_err();
        assert!(matches!(err, SolverError::VanishingIndicator { .. }));
    }
}

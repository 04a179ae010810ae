//! State-vector helpers: normalization, overlaps, phases and random states.

use num_complex::Complex64;
use rand::Rng;

use crate::error::{SolverError, SolverResult};
use crate::linalg::{CMatrix, CVector, adjoint, vector_norm};

/// Scale `v` to unit norm. A zero vector is returned unchanged.
pub fn normalize(v: &CVector) -> CVector {
    let norm = vector_norm(v);
    if norm == 0.0 {
        return v.clone();
    }
    v.mapv(|z| z / norm)
}

/// Overlap magnitude `|⟨ψ|φ⟩|`.
pub fn fidelity(psi: &CVector, phi: &CVector) -> SolverResult<f64> {
    if psi.len() != phi.len() {
        return Err(SolverError::DimensionMismatch {
            expected: psi.len(),
            got: phi.len(),
        });
    }
    let overlap: Complex64 = psi.iter().zip(phi.iter()).map(|(a, b)| a.conj() * b).sum();
    Ok(overlap.norm())
}

/// Rotate the global phase so the first amplitude is real and non-negative.
pub fn drop_global_phase(psi: &CVector) -> CVector {
    match psi.first() {
        Some(&first) if first.norm() > 0.0 => {
            let phase = first.conj() / first.norm();
            psi.mapv(|z| z * phase)
        }
        _ => psi.clone(),
    }
}

fn single_qubit(psi: &CVector) -> SolverResult<CVector> {
    if psi.len() != 2 {
        return Err(SolverError::DimensionMismatch {
            expected: 2,
            got: psi.len(),
        });
    }
    Ok(drop_global_phase(&normalize(psi)))
}

/// Bloch-sphere angles `(θ, φ)` of a single-qubit state,
/// with `|ψ⟩ = cos(θ/2)|0⟩ + e^{iφ} sin(θ/2)|1⟩`.
///
/// `θ` is the full polar angle `2·acos(Re ψ₀)`, so `|1⟩` maps to `π` and
/// `|+⟩` to `π/2`. Callers comparing against the half-angle convention
/// `acos(Re ψ₀)` must halve it.
pub fn amplitudes_to_bloch(psi: &CVector) -> SolverResult<(f64, f64)> {
    let psi = single_qubit(psi)?;
    let theta = 2.0 * psi[0].re.clamp(-1.0, 1.0).acos();
    let phi = psi[1].arg();
    Ok((theta, phi))
}

/// Human-readable single-qubit state, e.g. `0.707 |0> + (0.000 + 0.707i) |1>`.
pub fn state_label(psi: &CVector) -> SolverResult<String> {
    let psi = single_qubit(psi)?;
    let a = psi[0].re;
    let (mut c, mut d) = (psi[1].re, psi[1].im);
    let sign1 = if c >= 0.0 { '+' } else { '-' };
    if sign1 == '-' {
        c = -c;
        d = -d;
    }
    let sign2 = if d >= 0.0 { '+' } else { '-' };
    Ok(format!("{a:.3} |0> {sign1} ({c:.3} {sign2} {:.3}i) |1>", d.abs()))
}

/// Uniformly drawn (unnormalized real and imaginary parts in `[0, 1)`) state
/// of dimension `dim`, normalized.
pub fn random_state<R: Rng>(dim: usize, rng: &mut R) -> CVector {
    let raw: CVector = (0..dim)
        .map(|_| Complex64::new(rng.r#gen::<f64>(), rng.r#gen::<f64>()))
        .collect();
    normalize(&raw)
}

/// Random positive semidefinite Hermitian matrix `M†M`.
pub fn random_hermitian<R: Rng>(n: usize, rng: &mut R) -> CMatrix {
    let m = CMatrix::from_shape_fn((n, n), |_| {
        Complex64::new(rng.r#gen::<f64>(), rng.r#gen::<f64>())
    });
    adjoint(&m).dot(&m)
}

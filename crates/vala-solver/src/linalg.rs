//! Dense complex linear algebra for small systems.
//!
//! Everything here works on `ndarray` arrays of [`Complex64`]. Spectral
//! quantities (eigenvalues, singular values) are computed by `nalgebra` on a
//! copy of the matrix.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2, s};
use num_complex::Complex64;

use crate::error::{SolverError, SolverResult};

/// Complex dense matrix.
pub type CMatrix = Array2<Complex64>;
/// Complex dense vector.
pub type CVector = Array1<Complex64>;

/// Relative tolerance used by [`allclose`]-style checks.
pub const RTOL: f64 = 1e-5;
/// Absolute tolerance used by [`allclose`]-style checks.
pub const ATOL: f64 = 1e-8;

/// `N×N` identity.
pub fn identity(n: usize) -> CMatrix {
    Array2::from_diag_elem(n, Complex64::new(1.0, 0.0))
}

/// Conjugate transpose.
pub fn adjoint(m: &CMatrix) -> CMatrix {
    m.t().mapv(|z| z.conj())
}

/// Kronecker product `a ⊗ b`.
pub fn kron(a: &CMatrix, b: &CMatrix) -> CMatrix {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    let mut out = Array2::zeros((ar * br, ac * bc));
    for ((i, j), &aij) in a.indexed_iter() {
        out.slice_mut(s![i * br..(i + 1) * br, j * bc..(j + 1) * bc])
            .assign(&b.mapv(|z| aij * z));
    }
    out
}

/// Outer product `|u⟩⟨v|`.
pub fn outer(u: &CVector, v: &CVector) -> CMatrix {
    Array2::from_shape_fn((u.len(), v.len()), |(i, j)| u[i] * v[j].conj())
}

/// Euclidean norm of a vector.
pub fn vector_norm(v: &CVector) -> f64 {
    v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

/// Promote a real matrix to complex.
pub fn to_complex_matrix(m: &Array2<f64>) -> CMatrix {
    m.mapv(|x| Complex64::new(x, 0.0))
}

/// Promote a real vector to complex.
pub fn to_complex_vector(v: &[f64]) -> CVector {
    v.iter().map(|&x| Complex64::new(x, 0.0)).collect()
}

/// Element-wise closeness, `|a - b| <= atol + rtol·|b|`.
pub fn allclose(a: &CMatrix, b: &CMatrix, rtol: f64, atol: f64) -> bool {
    a.dim() == b.dim()
        && a
            .iter()
            .zip(b.iter())
            .all(|(x, y)| (x - y).norm() <= atol + rtol * y.norm())
}

/// Check `M = M†` within the given absolute tolerance.
pub fn is_hermitian(m: &CMatrix, atol: f64) -> bool {
    m.is_square() && allclose(m, &adjoint(m), RTOL, atol)
}

/// Check `U†U ≈ I` on the real part, atol 1e-6.
pub fn is_unitary(u: &CMatrix) -> bool {
    if !u.is_square() {
        return false;
    }
    let gram = adjoint(u).dot(u).mapv(|z| Complex64::new(z.re, 0.0));
    allclose(&gram, &identity(u.nrows()), RTOL, 1e-6)
}

/// Fail with [`SolverError::NotHermitian`] unless `m` is Hermitian.
pub fn assert_hermitian(m: &CMatrix, name: &str) -> SolverResult<()> {
    if is_hermitian(m, ATOL) {
        Ok(())
    } else {
        Err(SolverError::NotHermitian(name.to_string()))
    }
}

/// Fail with [`SolverError::NotUnitary`] unless `u` is unitary.
pub fn assert_unitary(u: &CMatrix, name: &str) -> SolverResult<()> {
    if is_unitary(u) {
        Ok(())
    } else {
        Err(SolverError::NotUnitary(name.to_string()))
    }
}

fn to_dmatrix(m: &CMatrix) -> DMatrix<Complex64> {
    let (rows, cols) = m.dim();
    DMatrix::from_fn(rows, cols, |i, j| m[[i, j]])
}

/// Eigenvalues of a Hermitian matrix, ascending.
pub fn hermitian_eigenvalues(h: &CMatrix) -> SolverResult<Vec<f64>> {
    assert_hermitian(h, "H")?;
    let mut values: Vec<f64> = to_dmatrix(h).symmetric_eigenvalues().iter().copied().collect();
    values.sort_by(f64::total_cmp);
    Ok(values)
}

/// Eigenvalues of a general square matrix, in no particular order.
pub fn eigenvalues(m: &CMatrix) -> SolverResult<Vec<Complex64>> {
    if !m.is_square() {
        return Err(SolverError::DimensionMismatch {
            expected: m.nrows(),
            got: m.ncols(),
        });
    }
    if m.is_empty() {
        return Ok(Vec::new());
    }
    to_dmatrix(m)
        .eigenvalues()
        .map(|values| values.iter().copied().collect())
        .ok_or_else(|| SolverError::Decomposition("Schur iteration did not converge".into()))
}

/// Singular values, descending.
pub fn singular_values(m: &CMatrix) -> Vec<f64> {
    let mut values: Vec<f64> = to_dmatrix(m).singular_values().iter().copied().collect();
    values.sort_by(|a, b| b.total_cmp(a));
    values
}

/// Moduli of the values that define `‖M‖₂` and `κ(M)`.
///
/// Square matrices use `|λ|`, from the Hermitian solver when possible.
/// Rectangular ones use the singular values.
fn spectral_magnitudes(m: &CMatrix) -> SolverResult<Vec<f64>> {
    if !m.is_square() {
        return Ok(singular_values(m));
    }
    if is_hermitian(m, ATOL) {
        Ok(hermitian_eigenvalues(m)?.iter().map(|l| l.abs()).collect())
    } else {
        Ok(eigenvalues(m)?.iter().map(|l| l.norm()).collect())
    }
}

/// Spectral norm `max|λ|` (`σ_max` for rectangular matrices).
pub fn spectral_norm(m: &CMatrix) -> SolverResult<f64> {
    Ok(spectral_magnitudes(m)?.into_iter().fold(0.0, f64::max))
}

/// Condition number `max|λ| / min|λ|`; `f64::INFINITY` for singular matrices.
pub fn condition_number(m: &CMatrix) -> SolverResult<f64> {
    let magnitudes = spectral_magnitudes(m)?;
    let max = magnitudes.iter().copied().fold(0.0, f64::max);
    let min = magnitudes.iter().copied().fold(f64::INFINITY, f64::min);
    if min <= max * 1e-14 || min == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(max / min)
}

/// Format a float with four significant digits.
pub fn format_sig(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }
    if value == 0.0 {
        return "0".into();
    }
    let magnitude = value.abs().log10().floor() as i32;
    if !(-5..4).contains(&magnitude) {
        return format!("{value:.3e}");
    }
    let decimals = (3 - magnitude).max(0) as usize;
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// One-line summary of a matrix: `name: (norm=…, κ=…, shape=(r, c))`.
pub fn describe_matrix(name: &str, m: &CMatrix) -> SolverResult<String> {
    let (rows, cols) = m.dim();
    if rows > 1 && cols > 1 {
        Ok(format!(
            "{name}: (norm={}, κ={}, shape=({rows}, {cols}))",
            format_sig(spectral_norm(m)?),
            format_sig(condition_number(m)?)
        ))
    } else {
        let norm = m.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
        Ok(format!("{name}: (norm={}, shape=({rows}, {cols}))", format_sig(norm)))
    }
}

/// One-line summary of a vector: `name: (norm=…, shape=(n,))`.
pub fn describe_vector(name: &str, v: &CVector) -> String {
    format!(
        "{name}: (norm={}, shape=({},))",
        format_sig(vector_norm(v)),
        v.len()
    )
}

fn format_entry(z: Complex64, decimals: usize, complex: bool) -> String {
    if complex {
        let sign = if z.im < 0.0 { '-' } else { '+' };
        format!("{:.decimals$}{sign}{:.decimals$}j", z.re, z.im.abs())
    } else {
        format!("{:.decimals$}", z.re)
    }
}

/// Render a matrix row by row, rounding entries to `decimals` places.
///
/// Imaginary parts are only printed when some entry has one.
pub fn format_matrix(m: &CMatrix, decimals: usize) -> String {
    let complex = m.iter().any(|z| z.im.abs() > 0.5 * 10f64.powi(-(decimals as i32)));
    let cells: Vec<Vec<String>> = m
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|&z| format_entry(z, decimals, complex)).collect())
        .collect();
    let width = cells.iter().flatten().map(String::len).max().unwrap_or(0);
    cells
        .iter()
        .map(|row| {
            let body: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
            format!("[{}]", body.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a vector on one line, rounding entries to `decimals` places.
pub fn format_vector(v: &CVector, decimals: usize) -> String {
    let complex = v.iter().any(|z| z.im.abs() > 0.5 * 10f64.powi(-(decimals as i32)));
    let body: Vec<String> = v.iter().map(|&z| format_entry(z, decimals, complex)).collect();
    format!("[{}]", body.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_kron_identity() {
        let x = array![[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]];
        let k = kron(&identity(2), &x);
        assert_eq!(k.dim(), (4, 4));
        assert_eq!(k[[0, 1]], c(1.0, 0.0));
        assert_eq!(k[[2, 3]], c(1.0, 0.0));
        assert_eq!(k[[0, 3]], c(0.0, 0.0));
    }

    #[test]
    fn test_outer_is_projector() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let v = array![c(s, 0.0), c(0.0, s)];
        let p = outer(&v, &v);
        assert!(is_hermitian(&p, ATOL));
        assert!(allclose(&p.dot(&p), &p, RTOL, 1e-12));
    }

    #[test]
    fn test_hermitian_checks() {
        let y = array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]];
        assert!(is_hermitian(&y, ATOL));
        assert!(is_unitary(&y));
        assert!(assert_hermitian(&y, "Y").is_ok());

        let upper = array![[c(1.0, 0.0), c(2.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]];
        assert!(matches!(
            assert_hermitian(&upper, "U"),
            Err(SolverError::NotHermitian(_))
        ));
        assert!(matches!(
            assert_unitary(&upper, "U"),
            Err(SolverError::NotUnitary(_))
        ));
    }

    #[test]
    fn test_hermitian_eigenvalues_ascending() {
        let m = array![[2.0, 1.0, 0.0], [1.0, 2.0, 1.0], [0.0, 1.0, 2.0]];
        let evs = hermitian_eigenvalues(&to_complex_matrix(&m)).unwrap();
        let r2 = 2.0_f64.sqrt();
        assert_relative_eq!(evs[0], 2.0 - r2, epsilon = 1e-10);
        assert_relative_eq!(evs[1], 2.0, epsilon = 1e-10);
        assert_relative_eq!(evs[2], 2.0 + r2, epsilon = 1e-10);
    }

    #[test]
    fn test_hermitian_eigenvalues_of_pauli_y() {
        let y = array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]];
        let evs = hermitian_eigenvalues(&y).unwrap();
        assert_eq!(evs.len(), 2);
        assert_relative_eq!(evs[0], -1.0, epsilon = 1e-10);
        assert_relative_eq!(evs[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_norm_and_condition() {
        let d = array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-4.0, 0.0)]];
        assert_relative_eq!(spectral_norm(&d).unwrap(), 4.0, epsilon = 1e-10);
        assert_relative_eq!(condition_number(&d).unwrap(), 4.0, epsilon = 1e-10);

        // Non-normal matrices go by eigenvalue moduli, not singular values.
        let upper = array![[c(2.0, 0.0), c(5.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]];
        assert_relative_eq!(spectral_norm(&upper).unwrap(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(condition_number(&upper).unwrap(), 2.0, epsilon = 1e-9);

        // Real rotation-like matrix with eigenvalues ±2i.
        let rot = array![[c(0.0, 0.0), c(-2.0, 0.0)], [c(2.0, 0.0), c(0.0, 0.0)]];
        assert_relative_eq!(spectral_norm(&rot).unwrap(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(condition_number(&rot).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_non_hermitian_3x3_eigenvalue_moduli() {
        // Upper triangular, so the eigenvalues are the diagonal: 3, -1, 0.5.
        let m = array![
            [c(3.0, 0.0), c(1.0, 0.0), c(-2.0, 0.0)],
            [c(0.0, 0.0), c(-1.0, 0.0), c(4.0, 0.0)],
            [c(0.0, 0.0), c(0.0, 0.0), c(0.5, 0.0)]
        ];
        let mut moduli: Vec<f64> = eigenvalues(&m).unwrap().iter().map(|z| z.norm()).collect();
        moduli.sort_by(f64::total_cmp);
        assert_relative_eq!(moduli[0], 0.5, epsilon = 1e-9);
        assert_relative_eq!(moduli[1], 1.0, epsilon = 1e-9);
        assert_relative_eq!(moduli[2], 3.0, epsilon = 1e-9);
        assert_relative_eq!(condition_number(&m).unwrap(), 6.0, epsilon = 1e-8);
    }

    #[test]
    fn test_rectangular_uses_singular_values() {
        let m = array![
            [c(3.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(-4.0, 0.0), c(0.0, 0.0)]
        ];
        assert_eq!(singular_values(&m).len(), 2);
        assert_relative_eq!(singular_values(&m)[0], 4.0, epsilon = 1e-10);
        assert_relative_eq!(spectral_norm(&m).unwrap(), 4.0, epsilon = 1e-10);
        assert_relative_eq!(condition_number(&m).unwrap(), 4.0 / 3.0, epsilon = 1e-10);
        assert!(eigenvalues(&m).is_err());
    }

    #[test]
    fn test_unitary_condition_is_one() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let h = array![[c(s, 0.0), c(s, 0.0)], [c(s, 0.0), c(-s, 0.0)]];
        assert_relative_eq!(condition_number(&h).unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_singular_condition_is_infinite() {
        let m = array![[c(1.0, 0.0), c(2.0, 0.0)], [c(2.0, 0.0), c(4.0, 0.0)]];
        assert!(condition_number(&m).unwrap().is_infinite());
    }

    #[test]
    fn test_format_sig() {
        assert_eq!(format_sig(97.2247), "97.22");
        assert_eq!(format_sig(0.14477930), "0.1448");
        assert_eq!(format_sig(1.0), "1");
        assert_eq!(format_sig(f64::INFINITY), "inf");
        assert_eq!(format_sig(123_456.0), "1.235e5");
    }

    #[test]
    fn test_describe() {
        let v = array![c(3.0, 0.0), c(4.0, 0.0)];
        assert_eq!(describe_vector("|b>", &v), "|b>: (norm=5, shape=(2,))");
        let line = describe_matrix("I", &identity(2)).unwrap();
        assert_eq!(line, "I: (norm=1, κ=1, shape=(2, 2))");
        assert_eq!(format_vector(&v, 2), "[3.00 4.00]");
    }
}

//! Linear systems and their amplitude encoding.
//!
//! A classical system `A·x = b` of size `m` is embedded into `N = 2^n`
//! dimensions with `n = ceil(log2(m + 1))`. The last coordinate is the
//! *scaling indicator*: `A_ex[N-1, N-1] = 1` and `b_ex[N-1] = x_ex[N-1] = 1`.
//! After normalization the quantum solution `|x⟩` only fixes `x` up to scale;
//! dividing by the indicator amplitude restores the classical magnitudes.
//!
//! ```text
//!        ┌            ┐ ┌     ┐   ┌     ┐
//!        │  A   0   0 │ │  x  │   │  b  │
//! A_ex = │  0   I   0 │ │  0  │ = │  0  │
//!        │  0   0   1 │ │  1  │   │  1  │
//!        └            ┘ └     ┘   └     ┘
//! ```

use ndarray::{Array1, Array2, s};
use num_complex::Complex64;
use tracing::debug;

use crate::error::{SolverError, SolverResult};
use crate::linalg::{CMatrix, CVector, assert_hermitian, to_complex_matrix};
use crate::state::{fidelity, normalize};

/// Residual tolerance for `‖A·x − b‖∞`.
pub const CONSISTENCY_TOL: f64 = 1e-9;

/// Smallest indicator amplitude that can still be divided by.
pub const INDICATOR_TOL: f64 = 1e-12;

/// A real square linear system with its known solution.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    a: Array2<f64>,
    b: Array1<f64>,
    x: Array1<f64>,
}

impl LinearSystem {
    /// Create a system after checking shapes and `A·x = b`.
    pub fn new(a: Array2<f64>, b: Array1<f64>, x: Array1<f64>) -> SolverResult<Self> {
        let system = Self { a, b, x };
        system.validate()?;
        Ok(system)
    }

    /// Build from row-major nested vectors.
    pub fn from_rows(rows: &[Vec<f64>], b: Vec<f64>, x: Vec<f64>) -> SolverResult<Self> {
        let m = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != m) {
            return Err(SolverError::Inconsistent(format!(
                "matrix must be square: {m} rows but a row has {} entries",
                bad.len()
            )));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let a = Array2::from_shape_vec((m, m), flat)
            .map_err(|e| SolverError::Inconsistent(e.to_string()))?;
        Self::new(a, Array1::from(b), Array1::from(x))
    }

    /// The reference 3×3 system used throughout the experiments.
    ///
    /// ```text
    /// [ 2  5 -13] [12]   [10]
    /// [ 3 -9   3] [ 5] = [ 0]
    /// [-5  6   8] [ 3]   [-6]
    /// ```
    pub fn reference() -> Self {
        Self {
            a: ndarray::array![[2.0, 5.0, -13.0], [3.0, -9.0, 3.0], [-5.0, 6.0, 8.0]],
            b: ndarray::array![10.0, 0.0, -6.0],
            x: ndarray::array![12.0, 5.0, 3.0],
        }
    }

    /// Check shapes and that `A·x = b` within [`CONSISTENCY_TOL`].
    pub fn validate(&self) -> SolverResult<()> {
        let m = self.dim();
        if m == 0 {
            return Err(SolverError::Inconsistent("system is empty".into()));
        }
        if !self.a.is_square() {
            return Err(SolverError::Inconsistent(format!(
                "matrix must be square, got {:?}",
                self.a.dim()
            )));
        }
        if self.b.len() != m || self.x.len() != m {
            return Err(SolverError::Inconsistent(format!(
                "A is {m}×{m} but b has {} and x has {} entries",
                self.b.len(),
                self.x.len()
            )));
        }
        let residual = (&self.a.dot(&self.x) - &self.b)
            .iter()
            .fold(0.0_f64, |acc, r| acc.max(r.abs()));
        if !residual.is_finite() || residual > CONSISTENCY_TOL {
            return Err(SolverError::Inconsistent(format!(
                "‖A·x − b‖∞ = {residual:.3e} exceeds {CONSISTENCY_TOL:e}"
            )));
        }
        Ok(())
    }

    /// Size `m` of the classical system.
    pub fn dim(&self) -> usize {
        self.a.nrows()
    }

    /// Coefficient matrix.
    pub fn a(&self) -> &Array2<f64> {
        &self.a
    }

    /// Right-hand side.
    pub fn b(&self) -> &Array1<f64> {
        &self.b
    }

    /// Known classical solution.
    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    /// Pad to `N = 2^n ≥ m + 1` and place the scaling indicator at `N - 1`.
    pub fn embed(&self) -> EmbeddedSystem {
        let m = self.dim();
        let n = (m + 1).next_power_of_two();

        let mut a = Array2::<f64>::eye(n);
        a.slice_mut(s![..m, ..m]).assign(&self.a);
        let mut b = Array1::<f64>::zeros(n);
        b.slice_mut(s![..m]).assign(&self.b);
        let mut x = Array1::<f64>::zeros(n);
        x.slice_mut(s![..m]).assign(&self.x);
        b[n - 1] = 1.0;
        x[n - 1] = 1.0;

        debug!("Embedded {m}×{m} system into {n}×{n}");
        EmbeddedSystem {
            a,
            b,
            x,
            original_dim: m,
            indicator: n - 1,
            x_offset: 0,
            hermitized: false,
        }
    }

    /// Embed, optionally hermitize, then normalize.
    pub fn preprocess(&self, hermitize: bool) -> SolverResult<NormalizedSystem> {
        let embedded = self.embed();
        let embedded = if hermitize {
            embedded.hermitize()?
        } else {
            embedded
        };
        Ok(embedded.normalize(self.x.to_vec()))
    }
}

/// The padded system `A_ex·x_ex = b_ex` carrying the scaling indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedSystem {
    a: Array2<f64>,
    b: Array1<f64>,
    x: Array1<f64>,
    original_dim: usize,
    indicator: usize,
    x_offset: usize,
    hermitized: bool,
}

impl EmbeddedSystem {
    /// Padded dimension.
    pub fn dim(&self) -> usize {
        self.a.nrows()
    }

    /// Padded matrix.
    pub fn a(&self) -> &Array2<f64> {
        &self.a
    }

    /// Padded right-hand side.
    pub fn b(&self) -> &Array1<f64> {
        &self.b
    }

    /// Padded solution.
    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    /// Index of the scaling indicator in the solution vector.
    pub fn indicator(&self) -> usize {
        self.indicator
    }

    /// Size `m` of the system before padding.
    pub fn original_dim(&self) -> usize {
        self.original_dim
    }

    /// `A_ex · x_ex − b_ex`, infinity norm.
    pub fn residual(&self) -> f64 {
        (&self.a.dot(&self.x) - &self.b)
            .iter()
            .fold(0.0_f64, |acc, r| acc.max(r.abs()))
    }

    /// HHL-style symmetric embedding `[[0, A], [Aᵀ, 0]]`.
    ///
    /// `b_h = [b; 0]` and `x_h = [0; x]`, so the solution block and the
    /// indicator move to the second half.
    pub fn hermitize(&self) -> SolverResult<Self> {
        let n = self.dim();
        let mut a = Array2::<f64>::zeros((2 * n, 2 * n));
        a.slice_mut(s![..n, n..]).assign(&self.a);
        a.slice_mut(s![n.., ..n]).assign(&self.a.t());
        assert_hermitian(&to_complex_matrix(&a), "A_h")?;

        let mut b = Array1::<f64>::zeros(2 * n);
        b.slice_mut(s![..n]).assign(&self.b);
        let mut x = Array1::<f64>::zeros(2 * n);
        x.slice_mut(s![n..]).assign(&self.x);

        Ok(Self {
            a,
            b,
            x,
            original_dim: self.original_dim,
            indicator: n + self.indicator,
            x_offset: n + self.x_offset,
            hermitized: true,
        })
    }

    /// `A = A_ex / |b_ex|`, `|b⟩ = b_ex / |b_ex|`, `|x⟩ = x_ex / |x_ex|`.
    fn normalize(&self, target: Vec<f64>) -> NormalizedSystem {
        let b_norm = self.b.dot(&self.b).sqrt();
        let x_norm = self.x.dot(&self.x).sqrt();
        NormalizedSystem {
            a: to_complex_matrix(&(&self.a / b_norm)),
            b: self.b.mapv(|v| Complex64::new(v / b_norm, 0.0)),
            x: self.x.mapv(|v| Complex64::new(v / x_norm, 0.0)),
            target,
            indicator: self.indicator,
            x_offset: self.x_offset,
            hermitized: self.hermitized,
        }
    }
}

/// The normalized problem handed to the quantum side.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSystem {
    a: CMatrix,
    b: CVector,
    x: CVector,
    target: Vec<f64>,
    indicator: usize,
    x_offset: usize,
    hermitized: bool,
}

impl NormalizedSystem {
    /// Scaled matrix `A`.
    pub fn a(&self) -> &CMatrix {
        &self.a
    }

    /// Normalized right-hand side `|b⟩`.
    pub fn b(&self) -> &CVector {
        &self.b
    }

    /// Normalized solution `|x⟩`, the state the ansatz should prepare.
    pub fn x(&self) -> &CVector {
        &self.x
    }

    /// The original classical solution of length `m`.
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// State dimension `N`.
    pub fn dim(&self) -> usize {
        self.b.len()
    }

    /// Number of qubits `log2(N)`.
    pub fn num_qubits(&self) -> usize {
        self.dim().trailing_zeros() as usize
    }

    /// Index of the scaling indicator.
    pub fn indicator(&self) -> usize {
        self.indicator
    }

    /// Whether the hermitized embedding is used.
    pub fn is_hermitized(&self) -> bool {
        self.hermitized
    }

    /// `|⟨b| normalize(A|x⟩)⟩`, equal to 1 for a consistent system.
    pub fn encoding_fidelity(&self) -> SolverResult<f64> {
        let ax = self.a.dot(&self.x);
        fidelity(&normalize(&ax), &self.b)
    }

    /// Decode amplitudes back to the classical solution.
    ///
    /// Divides by the indicator amplitude and keeps the `m` entries of the
    /// solution block.
    pub fn postprocess(&self, x_tilde: &[f64]) -> SolverResult<Vec<f64>> {
        if x_tilde.len() != self.dim() {
            return Err(SolverError::DimensionMismatch {
                expected: self.dim(),
                got: x_tilde.len(),
            });
        }
        let scale = x_tilde[self.indicator];
        if !scale.is_finite() || scale.abs() < INDICATOR_TOL {
            return Err(SolverError::VanishingIndicator { value: scale });
        }
        let m = self.target.len();
        Ok(x_tilde[self.x_offset..self.x_offset + m]
            .iter()
            .map(|v| v / scale)
            .collect())
    }

    /// Mean absolute error between a decoded vector and the classical solution.
    pub fn l1_error(&self, x_hat: &[f64]) -> f64 {
        if self.target.is_empty() {
            return 0.0;
        }
        self.target
            .iter()
            .zip(x_hat)
            .map(|(x, y)| (x - y).abs())
            .sum::<f64>()
            / self.target.len() as f64
    }

    /// Real parts of `|x⟩`, the ideal readout.
    pub fn x_real(&self) -> Vec<f64> {
        self.x.iter().map(|z| z.re).collect()
    }
}

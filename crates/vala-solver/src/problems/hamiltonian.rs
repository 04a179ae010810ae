//! Problem Hamiltonian and its Pauli representation.
//!
//! The linear system is turned into a ground-state problem with
//!
//! H_A = A† (I − |b⟩⟨b|) A
//!
//! which is positive semidefinite and annihilates exactly the states
//! proportional to `A⁻¹|b⟩`. The dense matrix is decomposed into a sum of
//! Pauli strings H = Σᵢ cᵢ Pᵢ for expectation-value evaluation.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SolverError, SolverResult};
use crate::linalg::{CMatrix, adjoint, assert_hermitian, hermitian_eigenvalues, identity, outer};
use crate::problems::linear_system::NormalizedSystem;

/// Coefficients at or below this magnitude are dropped from decompositions.
pub const COEFFICIENT_TOL: f64 = 1e-12;

/// A single Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity operator.
    I,
    /// Pauli-X operator.
    X,
    /// Pauli-Y operator.
    Y,
    /// Pauli-Z operator.
    Z,
}

impl Pauli {
    const ALL: [Pauli; 4] = [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z];

    /// Get the name of this Pauli operator.
    pub fn name(&self) -> &'static str {
        match self {
            Pauli::I => "I",
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        }
    }
}

impl std::fmt::Display for Pauli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single term in a Pauli Hamiltonian.
///
/// Represents cᵢ * (P₀ ⊗ P₁ ⊗ ... ⊗ Pₙ)
/// where only non-identity Paulis are stored explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    /// The coefficient of this term.
    pub coefficient: f64,
    /// The non-identity Pauli operators, as (qubit_index, pauli).
    /// Empty means identity on all qubits.
    pub operators: Vec<(usize, Pauli)>,
}

impl PauliTerm {
    /// Create a new Pauli term.
    pub fn new(coefficient: f64, operators: Vec<(usize, Pauli)>) -> Self {
        Self {
            coefficient,
            operators,
        }
    }

    /// Create an identity term (scalar).
    pub fn identity(coefficient: f64) -> Self {
        Self::new(coefficient, vec![])
    }

    /// Create a single-qubit Z term.
    pub fn z(coefficient: f64, qubit: usize) -> Self {
        Self::new(coefficient, vec![(qubit, Pauli::Z)])
    }

    /// Create a single-qubit X term.
    pub fn x(coefficient: f64, qubit: usize) -> Self {
        Self::new(coefficient, vec![(qubit, Pauli::X)])
    }

    /// Create a single-qubit Y term.
    pub fn y(coefficient: f64, qubit: usize) -> Self {
        Self::new(coefficient, vec![(qubit, Pauli::Y)])
    }

    /// Check if this is an identity term.
    pub fn is_identity(&self) -> bool {
        self.operators.is_empty()
    }

    /// Get the maximum qubit index.
    pub fn max_qubit(&self) -> Option<usize> {
        self.operators.iter().map(|(q, _)| *q).max()
    }

    /// Act on basis state `|index⟩` of an `num_qubits`-wide register:
    /// `P|index⟩ = phase·|new_index⟩`.
    ///
    /// Wire 0 is the most significant bit of `index`. Every operator must act
    /// on a wire below `num_qubits`.
    pub fn apply_to_basis(&self, index: usize, num_qubits: usize) -> (usize, Complex64) {
        let mut new_index = index;
        let mut phase = Complex64::new(1.0, 0.0);

        for &(qubit, pauli) in &self.operators {
            debug_assert!(qubit < num_qubits, "qubit {qubit} outside {num_qubits} wires");
            let mask = 1 << (num_qubits - 1 - qubit);
            let set = index & mask != 0;
            match pauli {
                Pauli::I => {}
                Pauli::X => {
                    new_index ^= mask;
                }
                Pauli::Y => {
                    new_index ^= mask;
                    if set {
                        phase *= Complex64::new(0.0, -1.0);
                    } else {
                        phase *= Complex64::new(0.0, 1.0);
                    }
                }
                Pauli::Z => {
                    if set {
                        phase = -phase;
                    }
                }
            }
        }

        (new_index, phase)
    }

    /// `⟨ψ|P|ψ⟩ = Σₖ ψₖ · phaseₖ · conj(ψ_{k'})`, real for Hermitian `P`.
    pub fn expectation(&self, state: &[Complex64]) -> f64 {
        let num_qubits = state.len().trailing_zeros() as usize;
        let value: Complex64 = state
            .iter()
            .enumerate()
            .map(|(k, &amp)| {
                let (j, phase) = self.apply_to_basis(k, num_qubits);
                amp * phase * state[j].conj()
            })
            .sum();
        value.re
    }
}

impl std::fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.coefficient >= 0.0 {
            write!(f, "+{:.4} ", self.coefficient)?;
        } else {
            write!(f, "{:.4} ", self.coefficient)?;
        }

        if self.operators.is_empty() {
            write!(f, "I")?;
        } else {
            for (i, (qubit, pauli)) in self.operators.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}[{}]", pauli, qubit)?;
            }
        }
        Ok(())
    }
}

/// A Hamiltonian represented as a sum of Pauli terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliHamiltonian {
    /// The terms in the Hamiltonian.
    pub terms: Vec<PauliTerm>,
}

impl PauliHamiltonian {
    /// Create a new Hamiltonian from a list of terms.
    pub fn new(terms: Vec<PauliTerm>) -> Self {
        Self { terms }
    }

    /// Decompose a Hermitian `2^n × 2^n` matrix into Pauli strings.
    ///
    /// `c_P = Tr(P·H) / 2^n`; with `P|k⟩ = phaseₖ|k'⟩` the trace is
    /// `Σₖ phaseₖ · H[k, k']`. Terms with `|c_P| ≤ 1e-12` are dropped.
    pub fn decompose(h: &CMatrix) -> SolverResult<Self> {
        assert_hermitian(h, "H")?;
        let dim = h.nrows();
        if !dim.is_power_of_two() {
            return Err(SolverError::DimensionMismatch {
                expected: dim.next_power_of_two(),
                got: dim,
            });
        }
        let num_qubits = dim.trailing_zeros() as usize;

        let mut terms = Vec::new();
        for code in 0..(1_usize << (2 * num_qubits)) {
            let operators: Vec<(usize, Pauli)> = (0..num_qubits)
                .filter_map(|q| {
                    let pauli = Pauli::ALL[(code >> (2 * q)) & 3];
                    (pauli != Pauli::I).then_some((q, pauli))
                })
                .collect();
            let mut term = PauliTerm::new(0.0, operators);

            let trace: Complex64 = (0..dim)
                .map(|k| {
                    let (j, phase) = term.apply_to_basis(k, num_qubits);
                    phase * h[[k, j]]
                })
                .sum();
            term.coefficient = trace.re / dim as f64;

            if term.coefficient.abs() > COEFFICIENT_TOL {
                terms.push(term);
            }
        }

        debug!("Decomposed {dim}×{dim} matrix into {} Pauli terms", terms.len());
        Ok(Self { terms })
    }

    /// Rebuild the dense matrix on `num_qubits` qubits.
    pub fn to_matrix(&self, num_qubits: usize) -> CMatrix {
        let dim = 1 << num_qubits;
        let mut m = CMatrix::zeros((dim, dim));
        for term in &self.terms {
            for k in 0..dim {
                let (j, phase) = term.apply_to_basis(k, num_qubits);
                m[[j, k]] += phase * term.coefficient;
            }
        }
        m
    }

    /// Get the number of terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Get the number of qubits needed.
    pub fn num_qubits(&self) -> usize {
        self.terms
            .iter()
            .filter_map(|t| t.max_qubit())
            .max()
            .map(|m| m + 1)
            .unwrap_or(0)
    }

    /// Get the identity coefficient (if any).
    pub fn identity_coefficient(&self) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.is_identity())
            .map(|t| t.coefficient)
            .sum()
    }

    /// `⟨ψ|H|ψ⟩` summed term by term.
    pub fn expectation(&self, state: &[Complex64]) -> f64 {
        self.terms
            .iter()
            .map(|term| term.coefficient * term.expectation(state))
            .sum()
    }
}

impl std::fmt::Display for PauliHamiltonian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "[ham] n_terms: {}", self.num_terms())?;
        for term in &self.terms {
            writeln!(f, "  {}", term)?;
        }
        Ok(())
    }
}

/// Dense problem Hamiltonian.
#[derive(Debug, Clone, PartialEq)]
pub struct Hamiltonian {
    matrix: CMatrix,
    num_qubits: usize,
}

impl Hamiltonian {
    /// `H_A = A† (I − |b⟩⟨b|) A`.
    pub fn from_system(system: &NormalizedSystem) -> SolverResult<Self> {
        let a = system.a();
        let projector = identity(system.dim()) - outer(system.b(), system.b());
        let h = adjoint(a).dot(&projector).dot(a);
        Self::from_matrix(h)
    }

    /// Wrap a Hermitian `2^n × 2^n` matrix.
    ///
    /// The stored matrix is symmetrized to remove rounding noise.
    pub fn from_matrix(matrix: CMatrix) -> SolverResult<Self> {
        assert_hermitian(&matrix, "H_A")?;
        let dim = matrix.nrows();
        if !dim.is_power_of_two() {
            return Err(SolverError::DimensionMismatch {
                expected: dim.next_power_of_two(),
                got: dim,
            });
        }
        let matrix = (&matrix + &adjoint(&matrix)).mapv(|z| z * 0.5);
        Ok(Self {
            num_qubits: dim.trailing_zeros() as usize,
            matrix,
        })
    }

    /// The dense matrix.
    pub fn matrix(&self) -> &CMatrix {
        &self.matrix
    }

    /// Number of qubits acted on.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// `Re ⟨ψ|H|ψ⟩` using the dense matrix.
    pub fn expectation(&self, state: &[Complex64]) -> SolverResult<f64> {
        if state.len() != self.matrix.nrows() {
            return Err(SolverError::DimensionMismatch {
                expected: self.matrix.nrows(),
                got: state.len(),
            });
        }
        let value: Complex64 = self
            .matrix
            .rows()
            .into_iter()
            .zip(state)
            .map(|(row, psi_i)| {
                let h_psi: Complex64 = row.iter().zip(state).map(|(h, p)| h * p).sum();
                psi_i.conj() * h_psi
            })
            .sum();
        Ok(value.re)
    }

    /// Pauli decomposition of the matrix.
    pub fn decompose(&self) -> SolverResult<PauliHamiltonian> {
        PauliHamiltonian::decompose(&self.matrix)
    }

    /// Spectrum, ascending.
    pub fn eigenvalues(&self) -> SolverResult<Vec<f64>> {
        hermitian_eigenvalues(&self.matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{allclose, is_hermitian};
    use crate::problems::linear_system::LinearSystem;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn reference_hamiltonian() -> (NormalizedSystem, Hamiltonian) {
        let system = LinearSystem::reference().preprocess(false).unwrap();
        let h = Hamiltonian::from_system(&system).unwrap();
        (system, h)
    }

    #[test]
    fn test_pauli_term_creation() {
        let term = PauliTerm::new(-0.5, vec![(0, Pauli::Z), (1, Pauli::Z)]);
        assert_eq!(term.coefficient, -0.5);
        assert_eq!(term.operators.len(), 2);
        assert!(!term.is_identity());
        assert_eq!(term.to_string(), "-0.5000 Z[0] Z[1]");
    }

    #[test]
    fn test_identity_term() {
        let term = PauliTerm::identity(1.0);
        assert!(term.is_identity());
        assert_eq!(term.max_qubit(), None);
        assert_eq!(term.to_string(), "+1.0000 I");
    }

    #[test]
    fn test_hamiltonian() {
        let h = PauliHamiltonian::new(vec![
            PauliTerm::identity(-1.0),
            PauliTerm::z(0.5, 0),
            PauliTerm::z(-0.5, 1),
            PauliTerm::new(-0.25, vec![(0, Pauli::Z), (1, Pauli::Z)]),
        ]);

        assert_eq!(h.num_terms(), 4);
        assert_eq!(h.num_qubits(), 2);
        assert_eq!(h.identity_coefficient(), -1.0);
    }

    #[test]
    fn test_y_expectation_sign() {
        // |+i⟩ = (|0⟩ + i|1⟩)/√2 is the +1 eigenstate of Y.
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let plus_i = [c(s, 0.0), c(0.0, s)];
        assert_relative_eq!(PauliTerm::y(1.0, 0).expectation(&plus_i), 1.0, epsilon = 1e-12);
        assert_relative_eq!(PauliTerm::x(1.0, 0).expectation(&plus_i), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_decompose_single_qubit_paulis() {
        let y = array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]];
        let h = PauliHamiltonian::decompose(&y).unwrap();
        assert_eq!(h.num_terms(), 1);
        assert_eq!(h.terms[0].operators, vec![(0, Pauli::Y)]);
        assert_relative_eq!(h.terms[0].coefficient, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_decompose_respects_qubit_order() {
        // Wire 0 is the most significant bit: Z ⊗ I = diag(1, 1, -1, -1).
        let z0 = CMatrix::from_diag(&array![c(1.0, 0.0), c(1.0, 0.0), c(-1.0, 0.0), c(-1.0, 0.0)]);
        let h = PauliHamiltonian::decompose(&z0).unwrap();
        assert_eq!(h.num_terms(), 1);
        assert_eq!(h.terms[0].operators, vec![(0, Pauli::Z)]);

        let z1 = CMatrix::from_diag(&array![c(1.0, 0.0), c(-1.0, 0.0), c(1.0, 0.0), c(-1.0, 0.0)]);
        let h = PauliHamiltonian::decompose(&z1).unwrap();
        assert_eq!(h.terms[0].operators, vec![(1, Pauli::Z)]);
    }

    #[test]
    fn test_reference_hamiltonian_properties() {
        let (system, h) = reference_hamiltonian();
        assert_eq!(h.num_qubits(), 2);
        assert!(is_hermitian(h.matrix(), 1e-12));

        let evs = h.eigenvalues().unwrap();
        assert!(evs.iter().all(|&l| l > -1e-10));
        assert_relative_eq!(evs[0], 0.0, epsilon = 1e-10);

        let x = system.x().to_vec();
        assert_relative_eq!(h.expectation(&x).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_decomposition_reconstructs() {
        let (_, h) = reference_hamiltonian();
        let paulis = h.decompose().unwrap();
        assert!(paulis.num_terms() > 1);
        // A real symmetric matrix only needs strings with an even number of Y.
        for term in &paulis.terms {
            let ys = term.operators.iter().filter(|(_, p)| *p == Pauli::Y).count();
            assert_eq!(ys % 2, 0);
        }
        let rebuilt = paulis.to_matrix(h.num_qubits());
        assert!(allclose(&rebuilt, h.matrix(), 1e-9, 1e-12));
    }

    #[test]
    fn test_dense_and_pauli_expectations_agree() {
        let (_, h) = reference_hamiltonian();
        let paulis = h.decompose().unwrap();
        let state = [c(0.1, 0.2), c(-0.4, 0.1), c(0.5, -0.3), c(0.2, 0.63)];
        assert_relative_eq!(
            h.expectation(&state).unwrap(),
            paulis.expectation(&state),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_display_lists_terms() {
        let h = PauliHamiltonian::new(vec![PauliTerm::identity(0.5), PauliTerm::z(-0.25, 1)]);
        assert_eq!(h.to_string(), "[ham] n_terms: 2\n  +0.5000 I\n  -0.2500 Z[1]\n");
    }

    #[test]
    fn test_non_hermitian_rejected() {
        let m = array![[c(0.0, 0.0), c(1.0, 0.0)], [c(0.0, 0.0), c(0.0, 0.0)]];
        assert!(matches!(
            Hamiltonian::from_matrix(m),
            Err(SolverError::NotHermitian(_))
        ));
    }
}

//! Variational Algorithms for Linear Algebra
//!
//! This crate solves small linear systems `A·x = b` with a variational
//! quantum algorithm. The classical system is embedded into a `2^n`
//! dimensional space with a scaling indicator, turned into the Hamiltonian
//!
//! ```text
//! H_A = A† (I − |b⟩⟨b|) A
//! ```
//!
//! whose ground state is the normalized solution `|x⟩`, and an ansatz circuit
//! is trained to minimize `⟨ψ(θ)|H_A|ψ(θ)⟩`. The trained state is read out
//! exactly or from shots and rescaled through the indicator amplitude.
//!
//! # Overview
//!
//! - [`problems`]: [`LinearSystem`] embedding and normalization, the dense
//!   [`Hamiltonian`] and its [`PauliHamiltonian`] decomposition
//! - [`circuits`]: ansatz families
//! - [`gradient`] and [`optimizers`]: parameter-shift gradients and
//!   momentum, gradient descent and Adam steps
//! - [`runners`]: the training loop and the readouts
//! - [`pipeline`]: configuration to report in one call
//!
//! # Example
//!
//! ```rust
//! use vala_solver::{LinearSystem, Hamiltonian};
//!
//! let system = LinearSystem::reference().preprocess(false).unwrap();
//! assert_eq!(system.num_qubits(), 2);
//!
//! let h = Hamiltonian::from_system(&system).unwrap();
//! let x: Vec<_> = system.x().to_vec();
//! assert!(h.expectation(&x).unwrap().abs() < 1e-10);
//! ```

pub mod circuits;
pub mod config;
pub mod error;
pub mod gradient;
pub mod linalg;
pub mod optimizers;
pub mod pipeline;
pub mod problems;
pub mod report;
pub mod runners;
pub mod state;

pub use circuits::{Ansatz, AnsatzKind};
pub use config::{SolverConfig, SystemSpec};
pub use error::{SolverError, SolverResult};
pub use gradient::GradientMethod;
pub use optimizers::{Adam, GradientDescent, Momentum, Optimizer, OptimizerKind};
pub use pipeline::{Problem, Solution};
pub use problems::{Hamiltonian, LinearSystem, NormalizedSystem, PauliHamiltonian};
pub use report::RunReport;
pub use runners::{InitStrategy, MeasurementReport, TrainingResult, TrainingStep, VqaRunner};

//! Problem definitions: the classical system and its Hamiltonian.

pub mod hamiltonian;
pub mod linear_system;

pub use hamiltonian::{Hamiltonian, Pauli, PauliHamiltonian, PauliTerm};
pub use linear_system::{EmbeddedSystem, LinearSystem, NormalizedSystem};

//! CLI command implementations.

pub mod common;
pub mod draw;
pub mod hamiltonian;
pub mod inspect;
pub mod solve;
pub mod version;

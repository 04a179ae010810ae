//! Parameterized circuit families.

pub mod ansatz;

pub use ansatz::{Ansatz, AnsatzKind};

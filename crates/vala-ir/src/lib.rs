//! VALA Circuit Intermediate Representation
//!
//! This crate provides the data structures used to describe the parameterized
//! circuits of the variational linear solver. Circuits are short, flat
//! instruction lists over a handful of qubits; every rotation angle is bound
//! at construction time, so a new [`Circuit`] is built for each parameter
//! vector the optimizer visits.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] addresses a wire; wire 0 is the most
//!   significant bit of the amplitude index
//! - **Gates**: [`StandardGate`] for the gate set used by the ansatz families
//! - **Instructions**: [`Instruction`] combining a gate with its operands
//! - **Circuit**: [`Circuit`] high-level builder API
//! - **Drawing**: [`draw`] renders a circuit as text, one row per wire
//!
//! # Example
//!
//! ```rust
//! use vala_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("ansatz", 2);
//! circuit.ry(0.5, QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.ry(-0.25, QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_parameters(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `X` | 1 | Pauli-X |
//! | `H` | 1 | Hadamard gate |
//! | `Ry`, `Rz` | 1 | Rotation gates, `exp(-iθσ/2)` |
//! | `CX` | 2 | Controlled-NOT (CNOT) |

pub mod circuit;
pub mod draw;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use draw::{draw, draw_with_precision};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::Instruction;
pub use qubit::QubitId;

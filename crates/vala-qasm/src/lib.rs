//! `OpenQASM` Emitter for VALA
//!
//! Serializes a [`vala_ir::Circuit`] as `OpenQASM` source so a trained ansatz
//! can be replayed by other toolchains. Two dialects are supported:
//!
//! | Dialect | Entry point | Registers |
//! |---------|-------------|-----------|
//! | `OPENQASM 2.0` | [`emit_qasm2`] | `qreg q[n];` / `creg c[n];` |
//! | `OPENQASM 3.0` | [`emit`] | `qubit[n] q;` / `bit[n] c;` |
//!
//! No measurements are appended: the exported program prepares the state and
//! leaves readout to the consumer.
//!
//! # Example
//!
//! ```rust
//! use vala_ir::{Circuit, QubitId};
//! use vala_qasm::emit_qasm2;
//!
//! let mut circuit = Circuit::with_size("bell", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let qasm = emit_qasm2(&circuit).unwrap();
//! assert!(qasm.starts_with("OPENQASM 2.0;"));
//! assert!(qasm.contains("qreg q[2];"));
//! assert!(qasm.contains("cx q[0],q[1];"));
//! ```

pub mod emitter;
pub mod error;

pub use emitter::{emit, emit_qasm2};
pub use error::{QasmError, QasmResult};

//! Statevector simulator for VALA circuits.
//!
//! The simulator serves two readouts of the trained ansatz:
//!
//! - [`Simulator::state`] returns the exact amplitudes, used for the loss
//!   and for the analytic measurement of the solution vector
//! - [`Simulator::sample`] draws computational-basis shots into [`Counts`],
//!   used for the sampled measurement
//!
//! Wire 0 is the most significant bit of the amplitude index, so on two
//! qubits `|q0 q1⟩` sits at index `2·q0 + q1`.
//!
//! # Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use vala_ir::{Circuit, QubitId};
//! use vala_sim::Simulator;
//!
//! let mut circuit = Circuit::with_size("bell", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let sim = Simulator::new();
//! let state = sim.state(&circuit).unwrap();
//! assert!((state.probabilities()[3] - 0.5).abs() < 1e-12);
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let counts = sim.sample(&circuit, 1000, &mut rng).unwrap();
//! assert_eq!(counts.total(), 1000);
//! assert_eq!(counts.get(1) + counts.get(2), 0);
//! ```

pub mod counts;
pub mod error;
pub mod simulator;
pub mod statevector;

pub use counts::Counts;
pub use error::{SimError, SimResult};
pub use simulator::Simulator;
pub use statevector::Statevector;

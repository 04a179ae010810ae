//! Ansatz circuits for the variational solver.
//!
//! An ansatz is a parameterized circuit whose output state is trained toward
//! the normalized solution `|x⟩`. Every parameter feeds exactly one `RY` or
//! `RZ` rotation, which is what makes the parameter-shift gradient exact.
//!
//! | Family | Width | Parameters |
//! |--------|-------|------------|
//! | `original` | n ≥ 2 | `n·(2 + 4·depth)` |
//! | `simple` | n ≥ 2 | `n·(1 + 2·depth)` |
//! | `two_local` | 2 | 6 |
//! | `swap_distro` | 2 | 3 |
//! | `compact` | 2 | 3 |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vala_ir::{Circuit, IrResult, QubitId};

use crate::error::{SolverError, SolverResult};

/// Available ansatz families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnsatzKind {
    /// Layered `RZ·RY` rotations around a CNOT ring, closed by a reversed ring.
    Original,
    /// `RY` per qubit, then per layer a CNOT ring with `RY` on both ends.
    Simple,
    /// Two qubits: `RY` layers around `CX(0,1)` and `CX(1,0)`.
    TwoLocal,
    /// Two qubits: three `RY` on qubit 0 distributing amplitude through CNOTs.
    SwapDistro,
    /// Two qubits: `RY`, `RY`, `CX(0,1)`, `RY`.
    Compact,
}

impl AnsatzKind {
    /// All families.
    pub const ALL: [AnsatzKind; 5] = [
        AnsatzKind::Original,
        AnsatzKind::Simple,
        AnsatzKind::TwoLocal,
        AnsatzKind::SwapDistro,
        AnsatzKind::Compact,
    ];

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            AnsatzKind::Original => "original",
            AnsatzKind::Simple => "simple",
            AnsatzKind::TwoLocal => "two_local",
            AnsatzKind::SwapDistro => "swap_distro",
            AnsatzKind::Compact => "compact",
        }
    }

    /// Width required by fixed two-qubit families, `None` for ring families.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            AnsatzKind::Original | AnsatzKind::Simple => None,
            AnsatzKind::TwoLocal | AnsatzKind::SwapDistro | AnsatzKind::Compact => Some(2),
        }
    }

    /// Parameter count for `num_qubits` wires and `depth` layers.
    pub fn num_parameters(&self, num_qubits: usize, depth: usize) -> usize {
        match self {
            AnsatzKind::Original => num_qubits * (2 + 4 * depth),
            AnsatzKind::Simple => num_qubits * (1 + 2 * depth),
            AnsatzKind::TwoLocal => 6,
            AnsatzKind::SwapDistro | AnsatzKind::Compact => 3,
        }
    }
}

impl fmt::Display for AnsatzKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnsatzKind {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        AnsatzKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| {
                SolverError::InvalidConfig(format!(
                    "unknown ansatz '{s}' (expected one of: original, simple, two_local, swap_distro, compact)"
                ))
            })
    }
}

/// An ansatz family bound to a width and depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ansatz {
    kind: AnsatzKind,
    num_qubits: usize,
    depth: usize,
}

impl Ansatz {
    /// Bind a family to a width, rejecting widths it cannot be built on.
    pub fn new(kind: AnsatzKind, num_qubits: usize, depth: usize) -> SolverResult<Self> {
        let unsupported = |reason: String| SolverError::UnsupportedAnsatz {
            ansatz: kind.name().to_string(),
            num_qubits,
            reason,
        };
        match kind.fixed_width() {
            Some(width) if width != num_qubits => {
                return Err(unsupported(format!("only defined on {width} qubits")));
            }
            None if num_qubits < 2 => {
                return Err(unsupported("the CNOT ring needs at least 2 qubits".into()));
            }
            _ => {}
        }
        Ok(Self {
            kind,
            num_qubits,
            depth,
        })
    }

    /// The family.
    pub fn kind(&self) -> AnsatzKind {
        self.kind
    }

    /// Circuit width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of entangling layers (ignored by fixed families).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Length of the parameter vector.
    pub fn num_parameters(&self) -> usize {
        self.kind.num_parameters(self.num_qubits, self.depth)
    }

    /// Build the circuit for a parameter vector.
    pub fn build(&self, params: &[f64]) -> SolverResult<Circuit> {
        let expected = self.num_parameters();
        if params.len() != expected {
            return Err(SolverError::ParameterCount {
                ansatz: self.kind.name().to_string(),
                expected,
                got: params.len(),
            });
        }

        let mut circuit = Circuit::with_size(self.kind.name(), self.num_qubits as u32);
        let mut theta = params.iter().copied();
        match self.kind {
            AnsatzKind::Original => original(&mut circuit, self.depth, &mut theta)?,
            AnsatzKind::Simple => simple(&mut circuit, self.depth, &mut theta)?,
            AnsatzKind::TwoLocal => two_local(&mut circuit, &mut theta)?,
            AnsatzKind::SwapDistro => swap_distro(&mut circuit, &mut theta)?,
            AnsatzKind::Compact => compact(&mut circuit, &mut theta)?,
        }
        Ok(circuit)
    }
}

/// Build `kind` on `num_qubits` wires with `depth` layers.
pub fn build(
    kind: AnsatzKind,
    num_qubits: usize,
    depth: usize,
    params: &[f64],
) -> SolverResult<Circuit> {
    Ansatz::new(kind, num_qubits, depth)?.build(params)
}

fn q(index: usize) -> QubitId {
    QubitId(index as u32)
}

// Lengths are checked in `Ansatz::build`, so the iterator never runs dry.
fn next(theta: &mut impl Iterator<Item = f64>) -> f64 {
    theta.next().unwrap_or(0.0)
}

fn original(
    circuit: &mut Circuit,
    depth: usize,
    theta: &mut impl Iterator<Item = f64>,
) -> IrResult<()> {
    let n = circuit.num_qubits();
    for i in 0..n {
        circuit.rz(next(theta), q(i))?;
        circuit.ry(next(theta), q(i))?;
    }
    for _ in 0..depth {
        for i in 0..n {
            let j = (i + 1) % n;
            circuit.cx(q(i), q(j))?;
            circuit.rz(next(theta), q(i))?;
            circuit.ry(next(theta), q(i))?;
            circuit.rz(next(theta), q(j))?;
            circuit.ry(next(theta), q(j))?;
        }
    }
    for i in (0..n).rev() {
        circuit.cx(q(i), q((i + 1) % n))?;
    }
    Ok(())
}

fn simple(
    circuit: &mut Circuit,
    depth: usize,
    theta: &mut impl Iterator<Item = f64>,
) -> IrResult<()> {
    let n = circuit.num_qubits();
    for i in 0..n {
        circuit.ry(next(theta), q(i))?;
    }
    for _ in 0..depth {
        for i in 0..n {
            let j = (i + 1) % n;
            circuit.cx(q(i), q(j))?;
            circuit.ry(next(theta), q(i))?;
            circuit.ry(next(theta), q(j))?;
        }
    }
    Ok(())
}

fn two_local(circuit: &mut Circuit, theta: &mut impl Iterator<Item = f64>) -> IrResult<()> {
    circuit.ry(next(theta), q(0))?.ry(next(theta), q(1))?;
    circuit.cx(q(0), q(1))?;
    circuit.ry(next(theta), q(0))?.ry(next(theta), q(1))?;
    circuit.cx(q(1), q(0))?;
    circuit.ry(next(theta), q(0))?.ry(next(theta), q(1))?;
    Ok(())
}

fn swap_distro(circuit: &mut Circuit, theta: &mut impl Iterator<Item = f64>) -> IrResult<()> {
    circuit.ry(next(theta), q(0))?;
    circuit.cx(q(0), q(1))?;
    circuit.ry(next(theta), q(0))?;
    circuit.cx(q(1), q(0))?;
    circuit.ry(next(theta), q(0))?;
    Ok(())
}

fn compact(circuit: &mut Circuit, theta: &mut impl Iterator<Item = f64>) -> IrResult<()> {
    circuit.ry(next(theta), q(0))?.ry(next(theta), q(1))?;
    circuit.cx(q(0), q(1))?;
    circuit.ry(next(theta), q(0))?;
    Ok(())
}

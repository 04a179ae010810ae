//! Run reports and exported artifacts.
//!
//! A solve writes four files sharing one stem under the output directory:
//!
//! | File | Content |
//! |------|---------|
//! | `<stem>.json` | [`RunReport`] |
//! | `<stem>.csv` | `iteration,loss` rows |
//! | `<stem>.svg` | loss curve |
//! | `<stem>.qasm` | trained circuit, `OPENQASM 2.0` |

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use vala_ir::Circuit;

use crate::config::SolverConfig;
use crate::error::SolverResult;
use crate::problems::PauliHamiltonian;
use crate::runners::{MeasurementReport, TrainingResult};

/// Shape and conditioning of the normalized system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSummary {
    /// Size `m` of the classical system.
    pub original_dim: usize,
    /// Embedded dimension `N`.
    pub dim: usize,
    /// Qubits in the ansatz.
    pub num_qubits: usize,
    /// Whether the hermitized embedding was used.
    pub hermitized: bool,
    /// Spectral norm of the scaled `A`.
    pub a_norm: f64,
    /// Condition number of the scaled `A`; `None` when singular.
    pub a_condition: Option<f64>,
    /// `|⟨b| normalize(A|x⟩)⟩`.
    pub encoding_fidelity: f64,
}

/// Ansatz metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsatzSummary {
    /// Family name, e.g. `simple`.
    pub kind: String,
    /// Length of the trained parameter vector.
    pub num_parameters: usize,
    /// Entangling layers requested.
    pub depth: usize,
    /// Gates in the built circuit.
    pub num_ops: usize,
    /// CNOTs in the built circuit.
    pub num_entangling_gates: usize,
}

/// Everything a solve produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Effective configuration.
    pub config: SolverConfig,
    /// Normalized system summary.
    pub system: SystemSummary,
    /// Pauli decomposition of `H_A`.
    pub hamiltonian: PauliHamiltonian,
    /// Trained circuit metadata.
    pub ansatz: AnsatzSummary,
    /// Training trajectory.
    pub training: TrainingResult,
    /// Exact readout.
    pub exact: MeasurementReport,
    /// Sampled readout; `None` when the indicator was never observed.
    pub sampled: Option<MeasurementReport>,
}

impl RunReport {
    /// Write as pretty JSON.
    pub fn save_json(&self, path: &Path) -> SolverResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!("Wrote report to {}", path.display());
        Ok(())
    }

    /// Read back a report written by [`RunReport::save_json`].
    pub fn load_json(path: &Path) -> SolverResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Paths of the artifacts for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// JSON [`RunReport`].
    pub report: PathBuf,
    /// Loss history as CSV.
    pub loss_csv: PathBuf,
    /// Loss curve as SVG.
    pub loss_svg: PathBuf,
    /// Trained circuit as OpenQASM 2.0.
    pub qasm: PathBuf,
}

impl ArtifactPaths {
    /// `<dir>/<stem>.{json,csv,svg,qasm}`.
    pub fn new(dir: &Path, stem: &str) -> Self {
        Self {
            report: dir.join(format!("{stem}.json")),
            loss_csv: dir.join(format!("{stem}.csv")),
            loss_svg: dir.join(format!("{stem}.svg")),
            qasm: dir.join(format!("{stem}.qasm")),
        }
    }
}

/// `iteration,loss` rows, iteration 0 being the initial loss.
pub fn loss_csv(losses: &[f64]) -> String {
    let mut out = String::from("iteration,loss\n");
    for (i, loss) in losses.iter().enumerate() {
        let _ = writeln!(out, "{i},{loss}");
    }
    out
}

/// Write the loss history as CSV.
pub fn write_loss_csv(path: &Path, losses: &[f64]) -> SolverResult<()> {
    std::fs::write(path, loss_csv(losses))?;
    Ok(())
}

const SVG_WIDTH: f64 = 640.0;
const SVG_HEIGHT: f64 = 400.0;
const SVG_MARGIN: f64 = 50.0;

/// Render the loss curve as a standalone SVG document.
pub fn render_loss_svg(losses: &[f64]) -> String {
    let finite: Vec<(usize, f64)> = losses
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, l)| l.is_finite())
        .collect();

    let (lo, hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, l)| {
            (lo.min(l), hi.max(l))
        });
    let (lo, hi) = if finite.is_empty() {
        (0.0, 1.0)
    } else if hi - lo < f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    };
    let last = losses.len().saturating_sub(1).max(1) as f64;

    let plot_w = SVG_WIDTH - 2.0 * SVG_MARGIN;
    let plot_h = SVG_HEIGHT - 2.0 * SVG_MARGIN;
    let sx = |i: usize| SVG_MARGIN + plot_w * i as f64 / last;
    let sy = |l: f64| SVG_MARGIN + plot_h * (hi - l) / (hi - lo);

    let points: Vec<String> = finite
        .iter()
        .map(|&(i, l)| format!("{:.2},{:.2}", sx(i), sy(l)))
        .collect();

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{SVG_WIDTH}" height="{SVG_HEIGHT}" viewBox="0 0 {SVG_WIDTH} {SVG_HEIGHT}">"#
    );
    let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);
    let (x0, y0, x1, y1) = (
        SVG_MARGIN,
        SVG_MARGIN,
        SVG_WIDTH - SVG_MARGIN,
        SVG_HEIGHT - SVG_MARGIN,
    );
    let _ = writeln!(
        svg,
        r#"  <path d="M{x0},{y0} L{x0},{y1} L{x1},{y1}" fill="none" stroke="black" stroke-width="1"/>"#
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" font-size="12" text-anchor="end">{}</text>"#,
        x0 - 6.0,
        y0 + 4.0,
        short(hi)
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" font-size="12" text-anchor="end">{}</text>"#,
        x0 - 6.0,
        y1 + 4.0,
        short(lo)
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{x0}" y="{}" font-size="12">0</text>"#,
        y1 + 18.0
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{x1}" y="{}" font-size="12" text-anchor="end">{}</text>"#,
        y1 + 18.0,
        losses.len().saturating_sub(1)
    );
    if !points.is_empty() {
        let _ = writeln!(
            svg,
            r#"  <polyline points="{}" fill="none" stroke="blue" stroke-opacity="0.75" stroke-width="1.5"/>"#,
            points.join(" ")
        );
    }
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" font-size="12" fill="blue">loss</text>"#,
        x1 - 40.0,
        y0 - 10.0
    );
    svg.push_str("</svg>\n");
    svg
}

fn short(value: f64) -> String {
    if value != 0.0 && (value.abs() < 1e-3 || value.abs() >= 1e4) {
        format!("{value:.2e}")
    } else {
        format!("{value:.4}")
    }
}

/// Write the loss curve as SVG.
pub fn write_loss_svg(path: &Path, losses: &[f64]) -> SolverResult<()> {
    std::fs::write(path, render_loss_svg(losses))?;
    Ok(())
}

/// Export a circuit as `OPENQASM 2.0`.
pub fn write_qasm(path: &Path, circuit: &Circuit) -> SolverResult<()> {
    let qasm = vala_qasm::emit_qasm2(circuit)?;
    std::fs::write(path, qasm)?;
    Ok(())
}

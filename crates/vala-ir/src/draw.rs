//! Text rendering of circuits.
//!
//! Gates are packed into layers: an instruction lands in the first layer
//! after every wire it spans (including the wires a CNOT crosses) is free.
//!
//! ```text
//! 0: ──RY(0.10)─╭●─┤
//! 1: ───────────╰X─┤
//! ```

use crate::circuit::Circuit;
use crate::gate::StandardGate;

/// Render a circuit with two decimals per angle.
pub fn draw(circuit: &Circuit) -> String {
    draw_with_precision(circuit, 2)
}

/// Render a circuit, printing angles with `precision` decimals.
pub fn draw_with_precision(circuit: &Circuit, precision: usize) -> String {
    let num_wires = circuit.num_qubits();
    let mut next_free = vec![0_usize; num_wires];
    let mut layers: Vec<Vec<String>> = Vec::new();

    for inst in circuit.instructions() {
        let Some((lo, hi)) = inst.span() else {
            continue;
        };
        let (lo, hi) = (lo as usize, hi as usize);
        let layer = (lo..=hi).map(|w| next_free[w]).max().unwrap_or(0);
        for slot in &mut next_free[lo..=hi] {
            *slot = layer + 1;
        }
        if layer == layers.len() {
            layers.push(vec![String::new(); num_wires]);
        }

        let cells = &mut layers[layer];
        match inst.gate {
            StandardGate::CX => {
                let control = inst.qubits[0].index();
                let target = inst.qubits[1].index();
                for (w, cell) in cells.iter_mut().enumerate().take(hi + 1).skip(lo) {
                    let corner = if w == lo {
                        "╭"
                    } else if w == hi {
                        "╰"
                    } else {
                        ""
                    };
                    *cell = if w == control {
                        format!("{corner}●")
                    } else if w == target {
                        format!("{corner}X")
                    } else {
                        "│".to_string()
                    };
                }
            }
            gate => {
                cells[inst.qubits[0].index()] = gate.label(precision);
            }
        }
    }

    let label_width = num_wires.saturating_sub(1).to_string().len();
    let mut lines: Vec<String> = (0..num_wires)
        .map(|w| format!("{w:>label_width$}: ──"))
        .collect();

    for cells in &layers {
        let width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        for (line, cell) in lines.iter_mut().zip(cells) {
            line.push_str(cell);
            line.push_str(&"─".repeat(width - cell.chars().count()));
            line.push('─');
        }
    }

    for line in &mut lines {
        line.push('┤');
    }
    lines.join("\n")
}

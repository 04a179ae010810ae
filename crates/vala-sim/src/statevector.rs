//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;

use vala_ir::{Circuit, Instruction, StandardGate};

use crate::error::{SimError, SimResult};

/// A statevector representing a quantum state.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Wrap existing amplitudes. The length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(SimError::InvalidDimension(len));
        }
        Ok(Self {
            num_qubits: len.trailing_zeros() as usize,
            amplitudes,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed with wire 0 as the most significant bit.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume the statevector, returning its amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Born-rule probabilities `|ψ_i|²`.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Squared norm of the state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Apply every instruction of `circuit` in order.
    pub fn run(&mut self, circuit: &Circuit) -> SimResult<()> {
        if circuit.num_qubits() > self.num_qubits {
            return Err(SimError::TooManyQubits {
                requested: circuit.num_qubits(),
                max: self.num_qubits as u32,
            });
        }
        for inst in circuit.instructions() {
            self.apply(inst);
        }
        Ok(())
    }

    /// Apply an instruction to the statevector.
    pub fn apply(&mut self, instruction: &Instruction) {
        let qubits: Vec<_> = instruction.qubits.iter().map(|q| q.index()).collect();
        match instruction.gate {
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::Ry(theta) => self.apply_ry(qubits[0], theta),
            StandardGate::Rz(theta) => self.apply_rz(qubits[0], theta),
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
        }
    }

    /// Bit of the amplitude index that carries `qubit`. Wire 0 is the most
    /// significant bit, so `|q0 q1 … q(n-1)⟩` reads left to right.
    fn mask(&self, qubit: usize) -> usize {
        debug_assert!(qubit < self.num_qubits, "qubit {qubit} out of range");
        1 << (self.num_qubits - 1 - qubit)
    }

    /// Visit every index pair `(i, i | mask)` with the `mask` bit clear in `i`.
    fn for_each_pair(&mut self, mask: usize, mut f: impl FnMut(&mut [Complex64], usize, usize)) {
        for i in (0..self.amplitudes.len()).filter(|i| i & mask == 0) {
            f(&mut self.amplitudes, i, i | mask);
        }
    }

    /// Apply the real 2×2 matrix `[[m00, m01], [m10, m11]]` to `qubit`.
    fn apply_real_1q(&mut self, qubit: usize, [m00, m01, m10, m11]: [f64; 4]) {
        let mask = self.mask(qubit);
        self.for_each_pair(mask, |amps, i, j| {
            let (a, b) = (amps[i], amps[j]);
            amps[i] = m00 * a + m01 * b;
            amps[j] = m10 * a + m11 * b;
        });
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = self.mask(qubit);
        self.for_each_pair(mask, |amps, i, j| amps.swap(i, j));
    }

    fn apply_h(&mut self, qubit: usize) {
        let r = std::f64::consts::FRAC_1_SQRT_2;
        self.apply_real_1q(qubit, [r, r, r, -r]);
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let (s, c) = (theta / 2.0).sin_cos();
        self.apply_real_1q(qubit, [c, -s, s, c]);
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let lower = Complex64::from_polar(1.0, -theta / 2.0);
        let upper = lower.conj();
        let mask = self.mask(qubit);
        self.for_each_pair(mask, |amps, i, j| {
            amps[i] *= lower;
            amps[j] *= upper;
        });
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let control = self.mask(control);
        let target = self.mask(target);
        self.for_each_pair(target, |amps, i, j| {
            if i & control != 0 {
                amps.swap(i, j);
            }
        });
    }

    // =========================================================================
    // Readout
    // =========================================================================

    /// Sample a measurement outcome in the computational basis.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i;
            }
        }

        // Rounding can leave the cumulative sum just below 1.
        self.amplitudes
            .iter()
            .rposition(|a| a.norm_sqr() > 0.0)
            .unwrap_or(self.amplitudes.len() - 1)
    }

    /// Convert measurement outcome to bitstring, qubit 0 first.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        format!("{:0width$b}", outcome, width = self.num_qubits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::PI;
    use vala_ir::QubitId;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_run_circuit() {
        let mut circuit = Circuit::with_size("bell", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let mut sv = Statevector::new(2);
        sv.run(&circuit).unwrap();
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));

        let mut narrow = Statevector::new(1);
        assert!(narrow.run(&circuit).is_err());
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply_h(0);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply_h(0);
        sv.apply_cx(0, 1);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_ry_pi_flips() {
        let mut sv = Statevector::new(1);
        sv.apply(&Instruction::single_qubit_gate(
            StandardGate::Ry(PI),
            QubitId(0),
        ));
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_rz_phases() {
        let mut sv = Statevector::new(1);
        sv.apply_h(0);
        sv.apply_rz(0, PI);
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(0.0, -sqrt2_inv)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, sqrt2_inv)));
    }

    #[test]
    fn test_wire_zero_is_most_significant() {
        // |q0=1, q1=0⟩ is index 2; CX(0,1) maps it to index 3.
        let mut sv = Statevector::new(2);
        sv.apply_x(0);
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(1.0, 0.0)));
        sv.apply_cx(0, 1);
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(1.0, 0.0)));
        assert_eq!(sv.outcome_to_bitstring(2), "10");
        assert_eq!(sv.outcome_to_bitstring(1), "01");
    }

    #[test]
    fn test_ry_kron_order() {
        // RY(a) ⊗ RY(b)|00⟩ = [cA·cB, cA·sB, sA·cB, sA·sB].
        let (a, b) = (0.7_f64, -1.3_f64);
        let mut sv = Statevector::new(2);
        sv.apply_ry(0, a);
        sv.apply_ry(1, b);
        let (sa, ca) = (a / 2.0).sin_cos();
        let (sb, cb) = (b / 2.0).sin_cos();
        let expected = [ca * cb, ca * sb, sa * cb, sa * sb];
        for (amp, want) in sv.amplitudes.iter().zip(expected) {
            assert!(approx_eq(*amp, Complex64::new(want, 0.0)));
        }
    }

    #[test]
    fn test_reversed_cnot() {
        // CX(1,0) flips wire 0 when wire 1 is set: |01⟩ → |11⟩.
        let mut sv = Statevector::new(2);
        sv.apply_x(1);
        sv.apply_cx(1, 0);
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_from_amplitudes() {
        let amps = vec![Complex64::new(0.6, 0.0), Complex64::new(0.0, 0.8)];
        let sv = Statevector::from_amplitudes(amps).unwrap();
        assert_eq!(sv.num_qubits(), 1);
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-12);
        assert!(Statevector::from_amplitudes(vec![Complex64::new(1.0, 0.0); 3]).is_err());
    }

    #[test]
    fn test_sample_deterministic() {
        // |1⟩ state should always sample to 1
        let mut sv = Statevector::new(1);
        sv.apply_x(0);

        let mut rng = StdRng::seed_from_u64(1024);
        for _ in 0..100 {
            assert_eq!(sv.sample(&mut rng), 1);
        }
    }
}

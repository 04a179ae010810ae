//! Property tests for the embedding and its decode.

use proptest::prelude::*;
use vala_solver::linalg::{ATOL, is_hermitian};
use vala_solver::{Hamiltonian, LinearSystem};

/// Diagonally dominant systems are well conditioned; `b` is derived from `x`.
fn system_strategy() -> impl Strategy<Value = LinearSystem> {
    (1usize..=5).prop_flat_map(|m| {
        (
            prop::collection::vec(-1.0f64..1.0, m * m),
            prop::collection::vec(-10.0f64..10.0, m),
        )
            .prop_map(move |(flat, x)| {
                let rows: Vec<Vec<f64>> = (0..m)
                    .map(|i| {
                        (0..m)
                            .map(|j| flat[i * m + j] + if i == j { m as f64 + 1.0 } else { 0.0 })
                            .collect()
                    })
                    .collect();
                let b: Vec<f64> = rows
                    .iter()
                    .map(|r| r.iter().zip(&x).map(|(a, v)| a * v).sum())
                    .collect();
                LinearSystem::from_rows(&rows, b, x).unwrap()
            })
    })
}

proptest! {
    #[test]
    fn decode_of_exact_encoding_recovers_x(system in system_strategy(), hermitize in any::<bool>()) {
        let normalized = system.preprocess(hermitize).unwrap();
        let decoded = normalized.postprocess(&normalized.x_real()).unwrap();
        prop_assert_eq!(decoded.len(), system.dim());
        for (d, x) in decoded.iter().zip(system.x().iter()) {
            prop_assert!((d - x).abs() < 1e-9 * (1.0 + x.abs()));
        }
        prop_assert!(normalized.l1_error(&decoded) < 1e-9 * (1.0 + system.x().iter().map(|v| v.abs()).sum::<f64>()));
    }

    #[test]
    fn embedding_preserves_the_system(system in system_strategy(), hermitize in any::<bool>()) {
        let normalized = system.preprocess(hermitize).unwrap();
        prop_assert!(normalized.dim().is_power_of_two());
        prop_assert!(normalized.dim() > system.dim());
        prop_assert!((normalized.encoding_fidelity().unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn hamiltonian_annihilates_solution(system in system_strategy()) {
        let normalized = system.preprocess(false).unwrap();
        let h = Hamiltonian::from_system(&normalized).unwrap();
        prop_assert!(is_hermitian(h.matrix(), ATOL));
        let x: Vec<_> = normalized.x().to_vec();
        prop_assert!(h.expectation(&x).unwrap().abs() < 1e-9);
        let pauli = h.decompose().unwrap();
        prop_assert!((pauli.expectation(&x) - h.expectation(&x).unwrap()).abs() < 1e-9);
    }
}

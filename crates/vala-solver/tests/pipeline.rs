//! End-to-end tests on the reference system.

use approx::assert_relative_eq;
use vala_sim::Simulator;
use vala_solver::circuits::ansatz::build;
use vala_solver::gradient::{finite_difference, parameter_shift};
use vala_solver::runners::pmeasure;
use vala_solver::{
    AnsatzKind, GradientMethod, LinearSystem, OptimizerKind, Problem, RunReport, SolverConfig,
    SolverError,
};

fn config(iters: usize) -> SolverConfig {
    SolverConfig {
        iters,
        log_every: 0,
        ..SolverConfig::default()
    }
}

#[test]
fn test_reference_problem_shape() {
    let problem = Problem::from_config(&config(1)).unwrap();
    assert_eq!(problem.system().num_qubits(), 2);
    assert_eq!(problem.ansatz().num_parameters(), 6);

    let summary = problem.summary().unwrap();
    assert_eq!(summary.original_dim, 3);
    assert_eq!(summary.dim, 4);
    assert_relative_eq!(summary.encoding_fidelity, 1.0, epsilon = 1e-12);
    // Eigenvalue moduli of diag(A, 1) / |b|: 13.5568, 12.6962, 0.13944 and 1, over √137.
    assert_relative_eq!(summary.a_norm, 1.158234420409502, epsilon = 1e-9);
    let kappa = summary.a_condition.expect("reference A is invertible");
    assert_relative_eq!(kappa, 97.22474957798252, epsilon = 1e-7);
}

#[test]
fn test_gradient_descent_decreases_loss() {
    let cfg = SolverConfig {
        optimizer: OptimizerKind::GradientDescent,
        lr: 0.05,
        ..config(30)
    };
    let problem = Problem::from_config(&cfg).unwrap();
    let result = problem.runner().unwrap().run().unwrap();
    assert_eq!(result.loss_history.len(), 31);
    assert!(result.final_loss < result.initial_loss());
    assert!(result.final_loss >= -1e-12, "H_A is positive semidefinite");
}

#[test]
fn test_parameter_shift_matches_finite_difference() {
    let problem = Problem::from_config(&config(1)).unwrap();
    let runner = problem.runner().unwrap();
    let params = [0.3, -0.7, 1.1, 0.05, -1.4, 0.9];

    let exact = parameter_shift(|p| runner.loss(p), &params).unwrap();
    let approx = finite_difference(|p| runner.loss(p), &params, 1e-6).unwrap();
    for (e, a) in exact.iter().zip(&approx) {
        assert_relative_eq!(e, a, epsilon = 1e-6);
    }
}

#[test]
fn test_full_solve_recovers_solution() {
    let problem = Problem::from_config(&config(200)).unwrap();
    let solution = problem.solve(|_| {}).unwrap();
    let report = &solution.report;

    assert!(report.training.final_loss < 1e-6);
    assert!(report.exact.fidelity > 0.9999);
    assert!(report.exact.l1_error < 0.05, "x_hat = {:?}", report.exact.x_hat);

    let sampled = report.sampled.as_ref().expect("indicator observed");
    assert_eq!(sampled.x_tilde.len(), 4);
    assert!(sampled.l1_error < 3.0, "x_hat = {:?}", sampled.x_hat);
    assert_eq!(solution.counts.as_ref().map(|c| c.total()), Some(10_000));
}

#[test]
fn test_artifacts_written() {
    let dir = tempfile::tempdir().unwrap();
    let problem = Problem::from_config(&config(5)).unwrap();
    let solution = problem.solve(|_| {}).unwrap();
    let paths = solution.write_artifacts(dir.path(), "run").unwrap();

    let csv = std::fs::read_to_string(&paths.loss_csv).unwrap();
    assert_eq!(csv.lines().count(), 1 + 6);
    assert!(csv.starts_with("iteration,loss\n"));

    let svg = std::fs::read_to_string(&paths.loss_svg).unwrap();
    assert!(svg.contains("<polyline"));

    let qasm = std::fs::read_to_string(&paths.qasm).unwrap();
    assert!(qasm.starts_with("OPENQASM 2.0;"));
    assert!(qasm.contains("qreg q[2];"));

    let loaded = RunReport::load_json(&paths.report).unwrap();
    assert_eq!(loaded.training.loss_history, solution.report.training.loss_history);
    assert_eq!(loaded.config.ansatz, AnsatzKind::Simple);
}

#[test]
fn test_hermitized_problem_adds_a_qubit() {
    let cfg = SolverConfig {
        hermitize: true,
        ..config(1)
    };
    let problem = Problem::from_config(&cfg).unwrap();
    assert_eq!(problem.system().num_qubits(), 3);
    assert!(problem.system().is_hermitized());
    assert!(problem.summary().unwrap().hermitized);
}

#[test]
fn test_two_qubit_family_on_wide_system_fails() {
    let cfg = SolverConfig {
        ansatz: AnsatzKind::Compact,
        hermitize: true,
        ..config(1)
    };
    assert!(matches!(
        Problem::from_config(&cfg),
        Err(SolverError::UnsupportedAnsatz { .. })
    ));
}

#[test]
fn test_finite_difference_training_matches_parameter_shift() {
    let base = SolverConfig {
        optimizer: OptimizerKind::GradientDescent,
        lr: 0.05,
        ..config(10)
    };
    let ps = Problem::from_config(&base).unwrap().runner().unwrap().run().unwrap();
    let fd_cfg = SolverConfig {
        gradient: GradientMethod::FiniteDifference,
        ..base
    };
    let fd = Problem::from_config(&fd_cfg).unwrap().runner().unwrap().run().unwrap();
    assert_relative_eq!(ps.final_loss, fd.final_loss, epsilon = 1e-6);
}

#[test]
fn test_every_family_recovers_reference_solution() {
    for kind in AnsatzKind::ALL {
        let cfg = SolverConfig {
            ansatz: kind,
            ..config(2000)
        };
        let problem = Problem::from_config(&cfg).unwrap();
        let solution = problem.solve(|_| {}).unwrap();
        let exact = &solution.report.exact;
        assert!(
            exact.l1_error < 1e-2,
            "{kind}: x_hat = {:?}, loss = {:e}",
            exact.x_hat,
            solution.report.training.final_loss
        );
    }
}

#[test]
fn test_pretrained_two_qubit_circuits_decode_reference() {
    let system = LinearSystem::reference().preprocess(false).unwrap();
    let pretrained = [
        (
            AnsatzKind::SwapDistro,
            [0.782011851189378, 0.04758310327698872, 0.44237422297673984],
        ),
        (
            AnsatzKind::Compact,
            [-0.047208991809220814, 0.7808882554867012, 0.509390326201012],
        ),
    ];
    for (kind, params) in pretrained {
        let circuit = build(kind, 2, 1, &params).unwrap();
        let report = pmeasure(&Simulator::new(), &circuit, &system).unwrap();
        for (got, want) in report.x_hat.iter().zip([12.0, 5.0, 3.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-6);
        }
    }
}

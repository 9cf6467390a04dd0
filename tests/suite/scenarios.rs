use homotopy_rootfinder::config::SolverTuning;
use homotopy_rootfinder::kdtree::KdTree;
use homotopy_rootfinder::oracle::FnOracle;
use homotopy_rootfinder::solver::{BaseSolver, CachingWrapper, HomotopyWrapper, Solver};
use nalgebra::{DMatrix, DVector};
use rand::prelude::*;

#[test]
fn scenario_1_linear_system_exact_one_step() {
    let oracle = FnOracle::new(2, 2, |p: &DVector<f64>, z: &DVector<f64>| {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 3.0]);
        let b = DMatrix::<f64>::identity(2, 2);
        let r = &a * z + &b * p;
        (r, a, b)
    });
    let mut solver = BaseSolver::new(oracle, DVector::from_vec(vec![0.0, 0.0]), DVector::from_vec(vec![0.0, 0.0]));

    let z = solver.solve(&DVector::from_vec(vec![4.0, 9.0]));

    assert!(solver.has_converged());
    assert_eq!(solver.needed_iterations(), 1);
    assert!((z[0] + 2.0).abs() < 1e-9);
    assert!((z[1] + 3.0).abs() < 1e-9);
}

#[test]
fn scenario_2_diode_resistor_scalar() {
    let is = 1e-12;
    let vt = 25e-3;
    let i_source = 1e-3;
    let oracle = FnOracle::new(1, 0, move |_p: &DVector<f64>, z: &DVector<f64>| {
        let exp_term = (z[0] / vt).exp();
        let r = DVector::from_vec(vec![z[0] + is * (exp_term - 1.0) - i_source]);
        let j = DMatrix::from_vec(1, 1, vec![1.0 + is * exp_term / vt]);
        let jp = DMatrix::zeros(1, 0);
        (r, j, jp)
    });

    let mut solver = BaseSolver::new(oracle, DVector::zeros(0), DVector::from_vec(vec![0.0]));
    let z = solver.solve(&DVector::zeros(0));

    assert!(solver.has_converged());
    let expected = vt * (i_source / is + 1.0).ln();
    assert!((z[0] - expected).abs() < 1e-6);
}

#[test]
fn scenario_3_homotopy_recovers_where_base_solver_fails() {
    // F(p, z) = z - p, valid only within `threshold` of the point it was
    // last asked about -- a stand-in for a Jacobian whose small-signal
    // model has broken down far from the last operating point.
    fn narrow_basin_oracle(
        center0: f64,
        threshold: f64,
    ) -> FnOracle<impl FnMut(&DVector<f64>, &DVector<f64>) -> (DVector<f64>, DMatrix<f64>, DMatrix<f64>)> {
        let mut valid_center = center0;
        FnOracle::new(1, 1, move |p: &DVector<f64>, z: &DVector<f64>| {
            let j = DMatrix::from_vec(1, 1, vec![1.0]);
            let jp = DMatrix::from_vec(1, 1, vec![-1.0]);
            if (p[0] - valid_center).abs() > threshold {
                (DVector::from_vec(vec![f64::NAN]), j, jp)
            } else {
                valid_center = p[0];
                (DVector::from_vec(vec![z[0] - p[0]]), j, jp)
            }
        })
    }

    let target = DVector::from_vec(vec![30.0]);

    let mut base = BaseSolver::new(
        narrow_basin_oracle(0.0, 10.0),
        DVector::from_vec(vec![0.0]),
        DVector::from_vec(vec![0.0]),
    );
    base.solve(&target);
    assert!(!base.has_converged());

    let base = BaseSolver::new(
        narrow_basin_oracle(0.0, 10.0),
        DVector::from_vec(vec![0.0]),
        DVector::from_vec(vec![0.0]),
    );
    let mut homotopy = HomotopyWrapper::new(base);
    let z = homotopy.solve(&target);

    assert!(homotopy.has_converged());
    assert!((z[0] - 30.0).abs() < 1e-9);
}

#[test]
fn scenario_4_cached_solver_converges_over_many_operating_points() {
    let tuning = SolverTuning::default();
    let oracle = FnOracle::new(3, 3, |p: &DVector<f64>, z: &DVector<f64>| {
        let r = z - p;
        let j = DMatrix::<f64>::identity(3, 3);
        let jp = -DMatrix::<f64>::identity(3, 3);
        (r, j, jp)
    });
    let base = BaseSolver::with_tuning(oracle, DVector::zeros(3), DVector::zeros(3), tuning);
    let mut cached = CachingWrapper::with_tuning(base, tuning);

    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..500 {
        let p = DVector::from_vec((0..3).map(|_| rng.gen_range(-100.0..100.0)).collect::<Vec<f64>>());
        cached.solve(&p);
        assert!(cached.has_converged());
    }
}

#[test]
fn scenario_6_origin_preserved_on_non_finite_failure() {
    let oracle = FnOracle::new(1, 1, |_p: &DVector<f64>, _z: &DVector<f64>| {
        let r = DVector::from_vec(vec![f64::NAN]);
        let j = DMatrix::from_vec(1, 1, vec![1.0]);
        let jp = DMatrix::from_vec(1, 1, vec![1.0]);
        (r, j, jp)
    });
    let mut solver = BaseSolver::new(oracle, DVector::from_vec(vec![0.0]), DVector::from_vec(vec![0.0]));
    let origin_before = solver.get_origin().1.clone();

    solver.solve(&DVector::from_vec(vec![1.0]));

    assert!(!solver.has_converged());
    assert_eq!(solver.get_origin().1, &origin_before);
}

#[test]
fn s7_homotopy_gives_up_within_bisection_cap() {
    let oracle = FnOracle::new(1, 1, |p: &DVector<f64>, z: &DVector<f64>| {
        let r = DVector::from_vec(vec![z[0] - p[0] + 1.0]);
        let j = DMatrix::from_vec(1, 1, vec![0.0]); // always singular
        let jp = DMatrix::from_vec(1, 1, vec![-1.0]);
        (r, j, jp)
    });
    let tuning = SolverTuning {
        max_bisections: 8,
        ..SolverTuning::default()
    };
    let base = BaseSolver::with_tuning(oracle, DVector::from_vec(vec![0.0]), DVector::from_vec(vec![0.0]), tuning);
    let mut homotopy = HomotopyWrapper::with_tuning(base, tuning);

    homotopy.solve(&DVector::from_vec(vec![5.0]));

    assert!(!homotopy.has_converged());
}

#[test]
fn s8_caching_wrapper_never_caches_a_failed_solve() {
    let oracle = FnOracle::new(1, 1, |_p: &DVector<f64>, _z: &DVector<f64>| {
        let r = DVector::from_vec(vec![f64::NAN]);
        let j = DMatrix::from_vec(1, 1, vec![1.0]);
        let jp = DMatrix::from_vec(1, 1, vec![1.0]);
        (r, j, jp)
    });
    let tuning = SolverTuning {
        cache_gate_iters: 0,
        ..SolverTuning::default()
    };
    let base = BaseSolver::with_tuning(oracle, DVector::from_vec(vec![0.0]), DVector::from_vec(vec![0.0]), tuning);
    let mut cached = CachingWrapper::with_tuning(base, tuning);

    cached.solve(&DVector::from_vec(vec![1.0]));

    assert!(!cached.has_converged());
    assert_eq!(cached.history_len(), 0);
}

#[test]
fn s9_kdtree_degenerate_inputs() {
    let empty = KdTree::build(DMatrix::zeros(3, 0));
    assert!(empty.is_empty());
    let query = DVector::from_vec(vec![1.0, 1.0, 1.0]);
    let (dist, idx) = empty.nearest(&query, (f64::INFINITY, None));
    assert_eq!(idx, None);
    assert_eq!(dist, f64::INFINITY);
    let (dist, idx) = empty.nearest(&query, (2.5, Some(3)));
    assert_eq!(idx, Some(3));
    assert_eq!(dist, 2.5);

    let single = KdTree::build(DMatrix::from_column_slice(3, 1, &[5.0, 5.0, 5.0]));
    let far_query = DVector::from_vec(vec![-100.0, 200.0, 0.0]);
    let (_, idx) = single.nearest(&far_query, (f64::INFINITY, None));
    assert_eq!(idx, Some(0));
}

use densvd::{DynMatrix, FactorShape, LinalgError, SvdOptions, SvdSolver};

fn sample() -> DynMatrix<f64> {
    DynMatrix::from_rows(4, 3, &[2.0, 0.0, 1.0, 1.0, 3.0, 0.0, 0.0, 1.0, 4.0, 1.0, 1.0, 1.0])
}

#[test]
fn queries_before_decompose_fail() {
    let solver = SvdSolver::<f64>::default();
    assert!(!solver.is_computed());
    assert_eq!(solver.singular_values().unwrap_err(), LinalgError::NotComputed);
    assert_eq!(solver.u().unwrap_err(), LinalgError::NotComputed);
    assert_eq!(solver.v().unwrap_err(), LinalgError::NotComputed);
    assert_eq!(solver.sigma().unwrap_err(), LinalgError::NotComputed);
    assert_eq!(solver.rank(), Err(LinalgError::NotComputed));
    assert_eq!(solver.condition_number(), Err(LinalgError::NotComputed));
    assert_eq!(solver.pseudo_inverse().unwrap_err(), LinalgError::NotComputed);
    assert_eq!(
        solver.solve(&DynMatrix::zeros(4, 1, 0.0)).unwrap_err(),
        LinalgError::NotComputed
    );
    assert!(solver.result().is_err());
}

#[test]
fn decompose_then_reset() {
    let a = sample();
    let mut solver = SvdSolver::new();
    solver.decompose(&a).unwrap();
    assert!(solver.is_computed());
    assert!(solver.has_vectors());

    let svd = solver.result().unwrap();
    assert!(svd.reconstruct().max_abs_diff(&a) < 1e-12);
    assert_eq!(solver.sigma().unwrap().shape(), (3, 3));
    assert_eq!(solver.rank(), Ok(3));
    assert!(solver.condition_number().unwrap() >= 1.0);

    let x_true = DynMatrix::from_rows(3, 1, &[1.0, -2.0, 0.5]);
    let b = &a * &x_true;
    let x = solver.solve(&b).unwrap();
    assert!(x.max_abs_diff(&x_true) < 1e-12);

    solver.reset();
    assert!(!solver.is_computed());
    assert_eq!(solver.singular_values().unwrap_err(), LinalgError::NotComputed);
}

#[test]
fn values_only_mode() {
    let a = sample();
    let mut solver = SvdSolver::new();
    solver.compute_values_only(&a).unwrap();
    assert!(solver.is_computed());
    assert!(!solver.has_vectors());

    let full = a.svd().unwrap();
    assert_eq!(solver.singular_values().unwrap(), full.singular_values());
    assert_eq!(solver.rank(), Ok(full.rank()));
    assert_eq!(solver.condition_number(), Ok(full.condition_number()));
    assert_eq!(solver.sigma().unwrap_err(), LinalgError::VectorsNotComputed);

    assert_eq!(solver.u().unwrap_err(), LinalgError::VectorsNotComputed);
    assert_eq!(solver.result().unwrap_err(), LinalgError::VectorsNotComputed);
    assert_eq!(
        solver.solve(&DynMatrix::zeros(4, 1, 0.0)).unwrap_err(),
        LinalgError::VectorsNotComputed
    );
}

#[test]
fn later_decomposition_replaces_earlier() {
    let mut solver = SvdSolver::new();
    solver.compute_values_only(&sample()).unwrap();

    let b = DynMatrix::from_rows(2, 2, &[0.0, 2.0, 1.0, 0.0]);
    solver.decompose(&b).unwrap();
    assert!(solver.has_vectors());
    assert_eq!(solver.singular_values().unwrap(), &[2.0, 1.0]);
    assert_eq!(solver.u().unwrap().shape(), (2, 2));
}

#[test]
fn options_carry_into_results() {
    let opts = SvdOptions::default()
        .with_factors(FactorShape::Full)
        .with_rank_tolerance(0.5);
    let mut solver = SvdSolver::with_options(opts);
    assert_eq!(solver.options(), &opts);

    let a = DynMatrix::from_diag(&[3.0, 1.0, 0.25]);
    solver.decompose(&a).unwrap();
    assert_eq!(solver.rank(), Ok(2));

    solver.compute_values_only(&a).unwrap();
    assert_eq!(solver.rank(), Ok(2));

    let tall = DynMatrix::from_rows(3, 1, &[1.0, 2.0, 2.0]);
    solver.decompose(&tall).unwrap();
    assert_eq!(solver.u().unwrap().shape(), (3, 3));
}

#[test]
fn dimension_mismatch_is_reported() {
    let mut solver = SvdSolver::new();
    solver.decompose(&sample()).unwrap();
    let err = solver.solve(&DynMatrix::zeros(3, 2, 0.0)).unwrap_err();
    assert_eq!(
        err,
        LinalgError::DimensionMismatch {
            expected: (4, 2),
            got: (3, 2)
        }
    );
    assert_eq!(
        err.to_string(),
        "dimension mismatch: expected (4, 2), got (3, 2)"
    );
}

#[test]
fn failed_decomposition_is_not_computed() {
    let mut solver = SvdSolver::with_options(SvdOptions::default().with_max_steps_per_value(0));
    let err = solver.decompose(&sample()).unwrap_err();
    assert_eq!(err, LinalgError::ConvergenceFailure);
    assert!(!solver.is_computed());
    assert_eq!(solver.last_error(), Some(LinalgError::ConvergenceFailure));
    assert_eq!(solver.rank(), Err(LinalgError::NotComputed));
}

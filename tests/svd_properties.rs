use approx::assert_relative_eq;
use densvd::{DynMatrix, FactorShape, Svd, SvdOptions};

const TOL: f64 = 1e-10;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic fill in (-1, 1).
fn pseudo_random(m: usize, n: usize, seed: u64) -> DynMatrix<f64> {
    let mut state = seed;
    let data = (0..m * n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
        })
        .collect();
    DynMatrix::from_vec(m, n, data)
}

fn assert_orthonormal_columns(q: &DynMatrix<f64>, tol: f64, what: &str) {
    let gram = &q.transpose() * q;
    let diff = gram.max_abs_diff(&DynMatrix::eye(q.ncols(), 0.0));
    assert!(diff < tol, "{}ᵀ{} differs from I by {}", what, what, diff);
}

fn assert_valid(a: &DynMatrix<f64>, svd: &Svd<f64>) {
    let sv = svd.singular_values();
    assert_eq!(sv.len(), a.nrows().min(a.ncols()));
    assert!(sv.iter().all(|&s| s >= 0.0), "negative σ: {:?}", sv);
    assert!(sv.windows(2).all(|w| w[0] >= w[1]), "not descending: {:?}", sv);
    assert_orthonormal_columns(svd.u(), 1e-12, "U");
    assert_orthonormal_columns(svd.v(), 1e-12, "V");
    let scale = a.frobenius_norm().max(1.0);
    let diff = svd.reconstruct().max_abs_diff(a);
    assert!(diff < 1e-12 * scale, "‖A - UΣVᵀ‖ = {}", diff);
}

/// Singular values from nalgebra, sorted descending.
fn reference_values(a: &DynMatrix<f64>) -> Vec<f64> {
    let na = nalgebra::DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[(i, j)]);
    let mut sv: Vec<f64> = na.singular_values().iter().copied().collect();
    sv.sort_by(|x, y| y.total_cmp(x));
    sv
}

// ── Factorization properties ─────────────────────────────────────────

#[test]
fn random_shapes_reconstruct() {
    init_logging();
    for (m, n, seed) in [(1, 1, 1), (5, 5, 2), (8, 3, 3), (3, 8, 4), (12, 7, 5), (2, 9, 6)] {
        let a = pseudo_random(m, n, seed);
        let svd = a.svd().unwrap();
        assert_valid(&a, &svd);
        assert_eq!(svd.is_transposed(), m < n);
    }
}

#[test]
fn agrees_with_reference_solver() {
    init_logging();
    for (m, n, seed) in [(6, 6, 11), (9, 4, 12), (4, 9, 13)] {
        let a = pseudo_random(m, n, seed);
        let ours = a.singular_values_only().unwrap();
        let theirs = reference_values(&a);
        for (x, y) in ours.iter().zip(&theirs) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12, max_relative = 1e-12);
        }
    }
}

#[test]
fn transpose_has_same_values() {
    let a = pseudo_random(7, 4, 21);
    let s1 = a.singular_values_only().unwrap();
    let s2 = a.transpose().singular_values_only().unwrap();
    for (x, y) in s1.iter().zip(&s2) {
        assert_relative_eq!(*x, *y, epsilon = 1e-13);
    }
}

#[test]
fn transpose_swaps_factors() {
    let a = pseudo_random(5, 3, 23);
    let svd = a.svd().unwrap();
    let svd_t = a.transpose().svd().unwrap();
    assert!(!svd.is_transposed());
    assert!(svd_t.is_transposed());
    assert_eq!(svd_t.u().shape(), (3, 3));
    assert_eq!(svd_t.v().shape(), (5, 3));

    let sv = svd.singular_values();
    assert!(sv.windows(2).all(|w| w[0] - w[1] > 1e-6), "values too close: {:?}", sv);

    // columns agree up to sign: V of A is U of Aᵀ and vice versa
    let dot = |x: Vec<f64>, y: Vec<f64>| x.iter().zip(&y).map(|(p, q)| p * q).sum::<f64>();
    for j in 0..3 {
        let vu = dot(svd.v().column(j), svd_t.u().column(j));
        let uv = dot(svd.u().column(j), svd_t.v().column(j));
        assert_relative_eq!(vu.abs(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(uv.abs(), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn full_and_thin_agree() {
    let a = pseudo_random(6, 3, 31);
    let thin = a.svd().unwrap();
    let full = Svd::with_options(&a, &SvdOptions::default().with_factors(FactorShape::Full)).unwrap();
    assert_eq!(full.u().shape(), (6, 6));
    assert_orthonormal_columns(full.u(), 1e-12, "U");
    assert_eq!(thin.singular_values(), full.singular_values());
    // the thin U is the leading block of the full U
    assert!(full.u().leading_columns(3).max_abs_diff(thin.u()) < 1e-14);
}

// ── Known decompositions ─────────────────────────────────────────────

#[test]
fn permuted_diagonal() {
    let a = DynMatrix::from_diag(&[3.0, 1.0, 2.0]);
    let svd = a.svd().unwrap();
    assert_eq!(svd.singular_values(), &[3.0, 2.0, 1.0]);
    // U and V are signed permutations
    for q in [svd.u(), svd.v()] {
        for j in 0..3 {
            let col = q.column(j);
            let ones = col.iter().filter(|x: &&f64| x.abs() == 1.0).count();
            let zeros = col.iter().filter(|x| **x == 0.0).count();
            assert_eq!((ones, zeros), (1, 2), "column {} is {:?}", j, col);
        }
    }
    assert_valid(&a, &svd);
}

#[test]
fn identity() {
    let a = DynMatrix::eye(4, 0.0);
    let svd = a.svd().unwrap();
    assert!(svd.singular_values().iter().all(|&s| s == 1.0));
    assert_eq!(svd.u(), &a);
    assert_eq!(svd.v(), &a);
    assert_eq!(svd.condition_number(), 1.0);
}

#[test]
fn rank_one_corner() {
    let a = DynMatrix::from_rows(2, 2, &[1.0, 0.0, 0.0, 0.0]);
    let svd = a.svd().unwrap();
    assert_eq!(svd.singular_values(), &[1.0, 0.0]);
    assert_eq!(svd.rank(), 1);
    assert!(!svd.is_full_rank());
}

#[test]
fn magic_square_symmetric_part() {
    // (M + Mᵀ)/2 for the 3x3 magic square keeps row sums 15, so 15 is its
    // dominant eigenvalue
    let m = DynMatrix::from_rows(3, 3, &[8.0, 1.0, 6.0, 3.0, 5.0, 7.0, 4.0, 9.0, 2.0]);
    let a = (&m + &m.transpose()).scale(0.5);
    let svd = a.svd().unwrap();
    assert_valid(&a, &svd);
    assert_relative_eq!(svd.operator_norm(), 15.0, epsilon = TOL);

    let na = nalgebra::Matrix3::from_fn(|i, j| a[(i, j)]);
    let mut eig: Vec<f64> = na
        .symmetric_eigen()
        .eigenvalues
        .iter()
        .map(|x| x.abs())
        .collect();
    eig.sort_by(|x, y| y.total_cmp(x));
    for (s, e) in svd.singular_values().iter().zip(&eig) {
        assert_relative_eq!(*s, *e, epsilon = TOL);
    }
}

#[test]
fn hilbert_is_ill_conditioned() {
    let a = DynMatrix::from_fn(6, 6, |i, j| 1.0 / (i + j + 1) as f64);
    let svd = a.svd().unwrap();
    assert_valid(&a, &svd);
    // cond₂(H₆) ≈ 1.495e7
    let cond = svd.condition_number();
    assert!(cond > 1.4e7 && cond < 1.6e7, "cond = {}", cond);
}

#[test]
fn graded_columns() {
    let a = DynMatrix::from_fn(5, 3, |i, j| ((i + 1) as f64).powi(j as i32) * 10f64.powi(-4 * j as i32));
    let svd = a.svd().unwrap();
    assert_valid(&a, &svd);
    assert_eq!(svd.rank(), 3);
}

#[test]
fn tiny_and_huge_scales() {
    for scale in [1e-150, 1e150] {
        let base = pseudo_random(4, 3, 41);
        let a = base.scale(scale);
        let sa = a.singular_values_only().unwrap();
        let sb = base.singular_values_only().unwrap();
        for (x, y) in sa.iter().zip(&sb) {
            assert_relative_eq!(*x / scale, *y, max_relative = 1e-12);
        }
    }
}

// ── Least squares ────────────────────────────────────────────────────

#[test]
fn least_squares_residual_is_orthogonal() {
    let a = pseudo_random(10, 4, 51);
    let b = pseudo_random(10, 2, 52);
    let x = a.svd().unwrap().solve(&b).unwrap();
    let r = &b - &(&a * &x);
    // normal equations: Aᵀ r = 0
    let atr = &a.transpose() * &r;
    assert!(atr.max_abs() < 1e-12, "Aᵀr = {}", atr);
}

#[test]
fn pseudo_inverse_of_wide_matrix() {
    let a = pseudo_random(3, 6, 61);
    let pinv = a.svd().unwrap().pseudo_inverse();
    assert_eq!(pinv.shape(), (6, 3));
    let aap = &a * &pinv;
    assert!(aap.max_abs_diff(&DynMatrix::eye(3, 0.0)) < 1e-12);
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_accumulation_is_identical() {
    let a = pseudo_random(20, 12, 71);
    let serial = a.svd().unwrap();
    let opts = SvdOptions::default().with_parallel_accumulation(true);
    let parallel = Svd::with_options(&a, &opts).unwrap();
    assert_eq!(serial.singular_values(), parallel.singular_values());
    assert_eq!(serial.u(), parallel.u());
    assert_eq!(serial.v(), parallel.v());
}

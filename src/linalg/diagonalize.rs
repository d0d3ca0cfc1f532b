//! Golub-Kahan-Reinsch implicit-shift diagonalization of a real bidiagonal.
//!
//! The iterator works on two arrays: the main diagonal `s` and the
//! superdiagonal `e`. Every plane rotation, exchange and sign flip it applies
//! is also reported to a pair of [`RotationSink`]s so the left and right
//! factors can be accumulated, recorded for later, or ignored.

use alloc::vec::Vec;

use log::{trace, warn};

use crate::dynmatrix::DynMatrix;
use crate::traits::{FloatScalar, LinalgScalar};

use super::elementary::{givens, negate_column, rotate_columns, swap_columns};
use super::LinalgError;

/// Receiver for the column operations of the diagonalization.
///
/// All three operations act on columns `i`, `j` of an accumulated factor.
pub trait RotationSink<R> {
    /// `(q_i, q_j) ← (c·q_i + s·q_j, −s·q_i + c·q_j)`.
    fn rotate(&mut self, i: usize, j: usize, c: R, s: R);
    /// Exchange columns `i` and `j`.
    fn exchange(&mut self, i: usize, j: usize);
    /// `q_j ← −q_j`.
    fn negate(&mut self, j: usize);
}

impl<T: LinalgScalar> RotationSink<T::Real> for DynMatrix<T> {
    #[inline]
    fn rotate(&mut self, i: usize, j: usize, c: T::Real, s: T::Real) {
        rotate_columns(self, i, j, c, s);
    }

    #[inline]
    fn exchange(&mut self, i: usize, j: usize) {
        swap_columns(self, i, j);
    }

    #[inline]
    fn negate(&mut self, j: usize) {
        negate_column(self, j);
    }
}

/// Sink that discards everything; used when only singular values are wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAccumulation;

impl<R> RotationSink<R> for NoAccumulation {
    #[inline]
    fn rotate(&mut self, _i: usize, _j: usize, _c: R, _s: R) {}
    #[inline]
    fn exchange(&mut self, _i: usize, _j: usize) {}
    #[inline]
    fn negate(&mut self, _j: usize) {}
}

/// One recorded sink operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneOp<R> {
    Rotate { i: usize, j: usize, c: R, s: R },
    Exchange { i: usize, j: usize },
    Negate { j: usize },
}

/// Ordered record of sink operations, replayable onto any other sink.
///
/// Lets the diagonalization run before the orthogonal factors exist, so the
/// factors can be formed and updated independently afterwards.
///
/// ```
/// use densvd::DynMatrix;
/// use densvd::linalg::{RotationLog, RotationSink};
///
/// let mut log = RotationLog::new();
/// log.rotate(0, 1, 0.6_f64, 0.8);
/// log.negate(1);
///
/// let mut q = DynMatrix::eye(2, 0.0_f64);
/// log.replay(&mut q);
/// assert_eq!(log.len(), 2);
/// assert!((q[(1, 0)] - 0.8).abs() < 1e-15);
/// assert!((q[(0, 1)] - 0.8).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RotationLog<R> {
    ops: Vec<PlaneOp<R>>,
}

impl<R> Default for RotationLog<R> {
    fn default() -> Self {
        Self { ops: Vec::new() }
    }
}

impl<R: Copy> RotationLog<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The recorded operations, oldest first.
    pub fn ops(&self) -> &[PlaneOp<R>] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Apply every recorded operation, in order, to `sink`.
    pub fn replay<S: RotationSink<R> + ?Sized>(&self, sink: &mut S) {
        for op in &self.ops {
            match *op {
                PlaneOp::Rotate { i, j, c, s } => sink.rotate(i, j, c, s),
                PlaneOp::Exchange { i, j } => sink.exchange(i, j),
                PlaneOp::Negate { j } => sink.negate(j),
            }
        }
    }
}

impl<R: Copy> RotationSink<R> for RotationLog<R> {
    fn rotate(&mut self, i: usize, j: usize, c: R, s: R) {
        self.ops.push(PlaneOp::Rotate { i, j, c, s });
    }

    fn exchange(&mut self, i: usize, j: usize) {
        self.ops.push(PlaneOp::Exchange { i, j });
    }

    fn negate(&mut self, j: usize) {
        self.ops.push(PlaneOp::Negate { j });
    }
}

/// Drive the bidiagonal `(s, e)` to diagonal form.
///
/// `s` holds the `r` diagonal entries and `e` the superdiagonal, with
/// `e.len() >= r` (the last slot is zeroed on entry). On success `s` holds
/// the singular values, non-negative and in descending order, and `e` is
/// zero. Rotations on the row side are reported to `left`, those on the
/// column side to `right`.
///
/// `max_steps_per_value` caps the number of passes spent on any one value
/// before it deflates; exceeding it yields [`LinalgError::ConvergenceFailure`].
/// Returns the total number of implicit QR sweeps.
///
/// ```
/// use densvd::linalg::diagonalize::diagonalize;
/// use densvd::linalg::NoAccumulation;
///
/// // [[1, 1], [0, 1]] has singular values φ and 1/φ
/// let mut s = [1.0_f64, 1.0];
/// let mut e = [1.0_f64, 0.0];
/// diagonalize(&mut s, &mut e, &mut NoAccumulation, &mut NoAccumulation, 75).unwrap();
/// let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
/// assert!((s[0] - phi).abs() < 1e-14);
/// assert!((s[1] - 1.0 / phi).abs() < 1e-14);
/// ```
pub fn diagonalize<R, L, V>(
    s: &mut [R],
    e: &mut [R],
    left: &mut L,
    right: &mut V,
    max_steps_per_value: usize,
) -> Result<usize, LinalgError>
where
    R: FloatScalar,
    L: RotationSink<R> + ?Sized,
    V: RotationSink<R> + ?Sized,
{
    let n = s.len();
    if n == 0 {
        return Ok(0);
    }
    assert!(e.len() >= n, "superdiagonal needs {} slots, got {}", n, e.len());
    let zero = R::zero();
    e[n - 1] = zero;

    let mut p = n;
    let mut passes = 0usize;
    let mut sweeps = 0usize;

    while p > 0 {
        // Largest negligible superdiagonal entry in the active block
        let mut lo = 0;
        for k in (0..p - 1).rev() {
            if e[k].is_small(s[k].abs() + s[k + 1].abs()) {
                e[k] = zero;
                lo = k + 1;
                break;
            }
        }

        if lo == p - 1 {
            converge(s, left, right, p - 1);
            trace!("value {} converged after {} passes", p - 1, passes);
            passes = 0;
            p -= 1;
            continue;
        }

        passes += 1;
        if passes > max_steps_per_value {
            warn!(
                "bidiagonal iteration stalled: {} passes on block {}..{} without deflation",
                passes - 1,
                lo,
                p
            );
            return Err(LinalgError::ConvergenceFailure);
        }

        // Negligible diagonal entry in the active block
        let mut split = None;
        for ks in (lo..p).rev() {
            let mut t = e[ks].abs();
            if ks > lo {
                t = t + e[ks - 1].abs();
            }
            if s[ks].is_small(t) {
                s[ks] = zero;
                split = Some(ks);
                break;
            }
        }

        match split {
            Some(ks) if ks == p - 1 => {
                trace!("deflating zero at s[{}] over {}..{}", ks, lo, p);
                chase_up(s, e, right, lo, p);
            }
            Some(ks) => {
                trace!("splitting at zero s[{}]", ks);
                chase_down(s, e, left, ks + 1, p);
            }
            None => {
                trace!("implicit QR sweep over {}..{}", lo, p);
                qr_sweep(s, e, left, right, lo, p);
                sweeps += 1;
            }
        }
    }

    Ok(sweeps)
}

/// `s[p-1]` is zero: rotate `e[p-2]` up the block on the column side.
fn chase_up<R: FloatScalar, V: RotationSink<R> + ?Sized>(
    s: &mut [R],
    e: &mut [R],
    right: &mut V,
    lo: usize,
    p: usize,
) {
    let mut f = e[p - 2];
    e[p - 2] = R::zero();
    for j in (lo..=p - 2).rev() {
        let rot = givens(s[j], f);
        s[j] = rot.r;
        if j != lo {
            f = -rot.s * e[j - 1];
            e[j - 1] = rot.c * e[j - 1];
        }
        right.rotate(j, p - 1, rot.c, rot.s);
    }
}

/// `s[k-1]` is zero: rotate `e[k-1]` down the block on the row side.
fn chase_down<R: FloatScalar, L: RotationSink<R> + ?Sized>(
    s: &mut [R],
    e: &mut [R],
    left: &mut L,
    k: usize,
    p: usize,
) {
    let mut f = e[k - 1];
    e[k - 1] = R::zero();
    for j in k..p {
        let rot = givens(s[j], f);
        s[j] = rot.r;
        f = -rot.s * e[j];
        e[j] = rot.c * e[j];
        left.rotate(j, k - 1, rot.c, rot.s);
    }
}

/// One implicit-shift QR step on the unreduced block `lo..p`, chasing the
/// bulge from the top to the bottom.
fn qr_sweep<R, L, V>(s: &mut [R], e: &mut [R], left: &mut L, right: &mut V, lo: usize, p: usize)
where
    R: FloatScalar,
    L: RotationSink<R> + ?Sized,
    V: RotationSink<R> + ?Sized,
{
    let two = R::one() + R::one();

    // Shift from the trailing 2x2, scaled against overflow
    let scale = s[p - 1]
        .abs()
        .max(s[p - 2].abs())
        .max(e[p - 2].abs())
        .max(s[lo].abs())
        .max(e[lo].abs());
    let sp = s[p - 1] / scale;
    let spm1 = s[p - 2] / scale;
    let epm1 = e[p - 2] / scale;
    let sk = s[lo] / scale;
    let ek = e[lo] / scale;
    let b = ((spm1 + sp) * (spm1 - sp) + epm1 * epm1) / two;
    let c = (sp * epm1) * (sp * epm1);
    let mut shift = R::zero();
    if b != R::zero() || c != R::zero() {
        let mut root = (b * b + c).sqrt();
        if b < R::zero() {
            root = -root;
        }
        shift = c / (b + root);
    }

    let mut f = (sk + sp) * (sk - sp) + shift;
    let mut g = sk * ek;
    for j in lo..p - 1 {
        let rot = givens(f, g);
        if j != lo {
            e[j - 1] = rot.r;
        }
        f = rot.c * s[j] + rot.s * e[j];
        e[j] = rot.c * e[j] - rot.s * s[j];
        g = rot.s * s[j + 1];
        s[j + 1] = rot.c * s[j + 1];
        right.rotate(j, j + 1, rot.c, rot.s);

        let rot = givens(f, g);
        s[j] = rot.r;
        f = rot.c * e[j] + rot.s * s[j + 1];
        s[j + 1] = -rot.s * e[j] + rot.c * s[j + 1];
        g = rot.s * e[j + 1];
        e[j + 1] = rot.c * e[j + 1];
        left.rotate(j, j + 1, rot.c, rot.s);
    }
    e[p - 2] = f;
}

/// `s[k]` has converged: make it non-negative and move it into sorted position.
fn converge<R, L, V>(s: &mut [R], left: &mut L, right: &mut V, mut k: usize)
where
    R: FloatScalar,
    L: RotationSink<R> + ?Sized,
    V: RotationSink<R> + ?Sized,
{
    if s[k] < R::zero() {
        s[k] = -s[k];
        right.negate(k);
    } else if s[k] == R::zero() {
        // normalizes -0.0
        s[k] = R::zero();
    }
    while k + 1 < s.len() && s[k] < s[k + 1] {
        s.swap(k, k + 1);
        left.exchange(k, k + 1);
        right.exchange(k, k + 1);
        k += 1;
    }
}

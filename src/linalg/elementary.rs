//! Elementary orthogonal transformations applied in place.
//!
//! Householder reflectors `H = I - τ v vᴴ` (with `v[0] = 1`) and Givens
//! plane rotations. Everything here works on any [`MatrixMut`] and touches
//! only the requested sub-range of rows or columns.

use alloc::vec;
use core::ops::Range;

use num_traits::{Float, Zero};

use crate::traits::{LinalgScalar, MatrixMut};

/// A Householder reflector produced by [`make_householder`].
///
/// The essential part of `v` (everything after the implicit leading one)
/// lives wherever the generating vector was stored. `tau == 0` encodes the
/// identity transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Householder<T: LinalgScalar> {
    /// Scale factor. Real for both real and complex elements.
    pub tau: T::Real,
    /// The value left in the leading position: `H x = beta · e₀`.
    pub beta: T,
}

impl<T: LinalgScalar> Householder<T> {
    /// Whether this reflector is the identity.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.tau == <T::Real as Zero>::zero()
    }
}

/// Generate a reflector that maps `x` onto a multiple of `e₀`.
///
/// On return `x[0]` holds `beta` and `x[1..]` holds the essential part of
/// `v`. The tail norm is accumulated with `hypot`, so no intermediate sum
/// of squares can overflow. A tail that is numerically zero (at or below the
/// smallest normal float) produces the identity reflector and leaves `x`
/// untouched; this is a no-op, not an error.
///
/// ```
/// use densvd::linalg::elementary::make_householder;
///
/// let mut x = [3.0_f64, 4.0];
/// let h = make_householder(&mut x);
/// assert!((h.beta + 5.0).abs() < 1e-14);
/// assert!((h.tau - 1.6).abs() < 1e-14);
/// ```
pub fn make_householder<T: LinalgScalar>(x: &mut [T]) -> Householder<T> {
    let zero = <T::Real as Zero>::zero();
    let Some((&alpha, tail)) = x.split_first() else {
        return Householder { tau: zero, beta: T::zero() };
    };

    let tail_norm = tail.iter().fold(zero, |acc, &xi| acc.hypot(xi.modulus()));
    if tail_norm <= <T::Real as Float>::min_positive_value() {
        return Householder { tau: zero, beta: alpha };
    }

    let alpha_abs = alpha.modulus();
    let norm = alpha_abs.hypot(tail_norm);
    let phase = alpha.phase();
    // v0 = alpha + sigma shares the phase of alpha, so there is no cancellation
    let v0 = phase * T::from_real(alpha_abs + norm);
    for xi in &mut x[1..] {
        *xi = *xi / v0;
    }
    let beta = T::zero() - phase * T::from_real(norm);
    x[0] = beta;

    Householder {
        tau: (alpha_abs + norm) / norm,
        beta,
    }
}

/// `A[row0.., cols] ← (I − τ v vᴴ) · A[row0.., cols]`.
///
/// `v` must have length `a.nrows() - row0` and carry its leading one
/// explicitly.
pub fn apply_householder_left<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    v: &[T],
    tau: T::Real,
    row0: usize,
    cols: Range<usize>,
) {
    if tau == <T::Real as Zero>::zero() {
        return;
    }
    debug_assert_eq!(v.len(), a.nrows() - row0);
    let tau = T::from_real(tau);
    for j in cols {
        let col = a.col_as_mut_slice(j, row0);
        let mut dot = T::zero();
        for (&vi, &ci) in v.iter().zip(col.iter()) {
            dot = dot + vi.conj() * ci;
        }
        let dot = dot * tau;
        for (&vi, ci) in v.iter().zip(col.iter_mut()) {
            *ci = *ci - dot * vi;
        }
    }
}

/// `A[rows, col0..] ← A[rows, col0..] · (I − τ v vᴴ)`.
///
/// `v` must have length `a.ncols() - col0` and carry its leading one
/// explicitly.
pub fn apply_householder_right<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    v: &[T],
    tau: T::Real,
    col0: usize,
    rows: Range<usize>,
) {
    if tau == <T::Real as Zero>::zero() || rows.is_empty() {
        return;
    }
    debug_assert_eq!(v.len(), a.ncols() - col0);
    let tau = T::from_real(tau);

    // w = A[rows, col0..] · v, accumulated column by column
    let mut w = vec![T::zero(); rows.len()];
    for (jj, &vj) in v.iter().enumerate() {
        let col = &a.col_as_slice(col0 + jj, rows.start)[..rows.len()];
        for (wi, &aij) in w.iter_mut().zip(col) {
            *wi = *wi + aij * vj;
        }
    }
    for (jj, &vj) in v.iter().enumerate() {
        let scale = tau * vj.conj();
        let col = &mut a.col_as_mut_slice(col0 + jj, rows.start)[..rows.len()];
        for (aij, &wi) in col.iter_mut().zip(&w) {
            *aij = *aij - wi * scale;
        }
    }
}

/// A Givens plane rotation `[c s; −s c]` with real parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneRotation<R> {
    pub c: R,
    pub s: R,
    /// `c·f + s·g`, the value left in the first slot.
    pub r: R,
}

/// Rotation that maps `(f, g)` onto `(r, 0)`.
///
/// Uses `hypot` rather than `sqrt(f² + g²)` so neither overflow nor
/// underflow occurs. `g == 0` yields the identity rotation.
///
/// ```
/// use densvd::linalg::elementary::givens;
///
/// let rot = givens(3.0_f64, 4.0);
/// assert!((rot.r - 5.0).abs() < 1e-15);
/// assert!((-rot.s * 3.0 + rot.c * 4.0).abs() < 1e-15);
/// ```
#[inline]
pub fn givens<R: Float>(f: R, g: R) -> PlaneRotation<R> {
    if g == R::zero() {
        return PlaneRotation {
            c: R::one(),
            s: R::zero(),
            r: f,
        };
    }
    let r = f.hypot(g);
    PlaneRotation {
        c: f / r,
        s: g / r,
        r,
    }
}

/// `(q_i, q_j) ← (c·q_i + s·q_j, −s·q_i + c·q_j)` over whole columns.
pub fn rotate_columns<T: LinalgScalar>(
    q: &mut impl MatrixMut<T>,
    i: usize,
    j: usize,
    c: T::Real,
    s: T::Real,
) {
    let (c, s) = (T::from_real(c), T::from_real(s));
    for row in 0..q.nrows() {
        let qi = *q.get(row, i);
        let qj = *q.get(row, j);
        *q.get_mut(row, i) = c * qi + s * qj;
        *q.get_mut(row, j) = c * qj - s * qi;
    }
}

/// Row form of [`rotate_columns`]: `(a_i, a_j) ← (c·a_i + s·a_j, −s·a_i + c·a_j)`
/// for rows `i` and `j`.
pub fn rotate_rows<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    i: usize,
    j: usize,
    c: T::Real,
    s: T::Real,
) {
    let (c, s) = (T::from_real(c), T::from_real(s));
    for col in 0..a.ncols() {
        let ai = *a.get(i, col);
        let aj = *a.get(j, col);
        *a.get_mut(i, col) = c * ai + s * aj;
        *a.get_mut(j, col) = c * aj - s * ai;
    }
}

/// Exchange columns `i` and `j`.
pub fn swap_columns<T: LinalgScalar>(q: &mut impl MatrixMut<T>, i: usize, j: usize) {
    if i == j {
        return;
    }
    for row in 0..q.nrows() {
        let tmp = *q.get(row, i);
        *q.get_mut(row, i) = *q.get(row, j);
        *q.get_mut(row, j) = tmp;
    }
}

/// `q_j ← −q_j`.
pub fn negate_column<T: LinalgScalar>(q: &mut impl MatrixMut<T>, j: usize) {
    for x in q.col_as_mut_slice(j, 0) {
        *x = T::zero() - *x;
    }
}

/// Multiply row `i` over `cols` by `s`.
pub(crate) fn scale_row_range<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    i: usize,
    cols: Range<usize>,
    s: T,
) {
    if s == T::one() {
        return;
    }
    for j in cols {
        *a.get_mut(i, j) = *a.get(i, j) * s;
    }
}

/// Multiply column `j` from `row0` down by `s`.
pub(crate) fn scale_col_from<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    j: usize,
    row0: usize,
    s: T,
) {
    if s == T::one() {
        return;
    }
    for x in a.col_as_mut_slice(j, row0) {
        *x = *x * s;
    }
}

//! Two-sided Householder reduction to real upper bidiagonal form.
//!
//! For a working matrix `A` (m × n, m ≥ n) this computes unitary `Q1`, `Q2`
//! and a real bidiagonal `B` with non-negative entries such that
//! `A = Q1 · B · Q2ᴴ`. The reflectors are stored in place; the factors are
//! only formed on request.

use alloc::vec;
use alloc::vec::Vec;

use log::trace;
use num_traits::Zero;

use crate::dynmatrix::DynMatrix;
use crate::traits::{LinalgScalar, MatrixMut, MatrixRef};

use super::elementary::{
    apply_householder_left, apply_householder_right, make_householder, scale_col_from,
    scale_row_range,
};
use super::Workspace;

/// Reduce the working copy to bidiagonal form in place.
///
/// Afterwards `ws.main_diagonal()` / `ws.super_diagonal()` hold the real
/// bidiagonal and `ws.q1(..)` / `ws.q2()` form the orthogonal factors.
/// Complex phases are moved into the factors so the bidiagonal is real and
/// non-negative for every element type. Calling this twice is a no-op.
pub fn bidiagonalize<T: LinalgScalar>(ws: &mut Workspace<T>) {
    if ws.reduced {
        return;
    }
    let (m, n) = (ws.nrows(), ws.ncols());
    let zero = <T::Real as Zero>::zero();

    ws.left_tau = vec![zero; n];
    ws.right_tau = vec![zero; n];
    ws.left_phase = vec![T::one(); n];
    ws.right_phase = vec![T::one(); n];
    ws.main = vec![zero; n];
    ws.off = vec![zero; n];

    let a = &mut ws.work;
    for k in 0..n {
        // Column k: annihilate below the diagonal
        let h = make_householder(a.col_as_mut_slice(k, k));
        ws.left_tau[k] = h.tau;
        if !h.is_identity() && k + 1 < n {
            let v = reflector_from_column(a, k, k + 1);
            apply_householder_left(a, &v, h.tau, k, k + 1..n);
        }
        let phase = h.beta.phase();
        ws.main[k] = h.beta.modulus();
        ws.left_phase[k] = phase;
        scale_row_range(a, k, k + 1..n, phase.conj());
        a[(k, k)] = T::from_real(ws.main[k]);

        if k + 1 >= n {
            continue;
        }

        // Row k: annihilate right of the superdiagonal. The reflector is built
        // from the conjugated row so that the same `H` works from the right.
        let mut x: Vec<T> = (k + 1..n).map(|j| a[(k, j)].conj()).collect();
        let h = make_householder(&mut x);
        ws.right_tau[k] = h.tau;
        if !h.is_identity() {
            x[0] = T::one();
            apply_householder_right(a, &x, h.tau, k + 1, k + 1..m);
            for (jj, &vj) in x.iter().enumerate().skip(1) {
                a[(k, k + 1 + jj)] = vj;
            }
        }
        let beta = h.beta.conj();
        let phase = beta.phase().conj();
        ws.off[k] = beta.modulus();
        ws.right_phase[k + 1] = phase;
        scale_col_from(a, k + 1, k + 1, phase);
        a[(k, k + 1)] = T::from_real(ws.off[k]);
    }

    ws.reduced = true;
    trace!("bidiagonalized {}x{} working matrix", m, n);
}

/// `[1, a[row0.., k]]`: the reflector whose tail sits below row `row0 - 1`
/// in column `k`.
fn reflector_from_column<T: LinalgScalar>(a: &DynMatrix<T>, k: usize, row0: usize) -> Vec<T> {
    let tail = a.col_as_slice(k, row0);
    let mut v = Vec::with_capacity(tail.len() + 1);
    v.push(T::one());
    v.extend_from_slice(tail);
    v
}

/// Form `Q1` (m × `cols`) by replaying the left reflectors backward onto the
/// leading `cols` columns of the identity.
pub(crate) fn accumulate_left<T: LinalgScalar>(ws: &Workspace<T>, cols: usize) -> DynMatrix<T> {
    let (m, n) = (ws.nrows(), ws.ncols());
    let mut q = DynMatrix::identity(m, cols);
    for k in (0..n).rev() {
        let tau = ws.left_tau[k];
        if tau == <T::Real as Zero>::zero() {
            continue;
        }
        let v = reflector_from_column(&ws.work, k, k + 1);
        apply_householder_left(&mut q, &v, tau, k, k..cols);
    }
    for (j, &phase) in ws.left_phase.iter().enumerate() {
        if phase != T::one() {
            scale_col_from(&mut q, j, 0, phase);
        }
    }
    q
}

/// Form `Q2` (n × n) from the right reflectors stored in the rows.
pub(crate) fn accumulate_right<T: LinalgScalar>(ws: &Workspace<T>) -> DynMatrix<T> {
    let n = ws.ncols();
    let mut q = DynMatrix::identity(n, n);
    for k in (0..n.saturating_sub(1)).rev() {
        let tau = ws.right_tau[k];
        if tau == <T::Real as Zero>::zero() {
            continue;
        }
        let mut v = Vec::with_capacity(n - k - 1);
        v.push(T::one());
        v.extend((k + 2..n).map(|j| ws.work[(k, j)]));
        apply_householder_left(&mut q, &v, tau, k + 1, k + 1..n);
    }
    for (j, &phase) in ws.right_phase.iter().enumerate() {
        if phase != T::one() {
            scale_col_from(&mut q, j, 0, phase);
        }
    }
    q
}

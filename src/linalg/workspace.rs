use alloc::vec::Vec;

use num_traits::Zero;

use crate::dynmatrix::DynMatrix;
use crate::traits::{LinalgScalar, MatrixRef};

use super::bidiag::{accumulate_left, accumulate_right};
use super::{FactorShape, LinalgError};

/// Working store for one decomposition.
///
/// Holds a copy of the input in canonical orientation (rows ≥ columns; a
/// wide input is stored as its adjoint). After [`bidiagonalize`] the buffer
/// holds the packed Householder vectors: the left reflectors below the
/// diagonal, the right reflectors to the right of the superdiagonal. The
/// real bidiagonal arrays and the complex phases absorbed during reduction
/// are kept alongside.
///
/// [`bidiagonalize`]: super::bidiagonalize
///
/// ```
/// use densvd::DynMatrix;
/// use densvd::linalg::{bidiagonalize, FactorShape, Workspace};
///
/// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// let mut ws = Workspace::new(&a);
/// assert!(!ws.is_reduced());
/// bidiagonalize(&mut ws);
///
/// // A = Q1 · B · Q2ᴴ
/// let q1 = ws.q1(FactorShape::Thin).unwrap();
/// let q2 = ws.q2().unwrap();
/// let b = DynMatrix::<f64>::from_real(&ws.bidiagonal().unwrap());
/// let back = &(&q1 * &b) * &q2.adjoint();
/// assert!(back.max_abs_diff(&a) < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Workspace<T: LinalgScalar> {
    pub(crate) work: DynMatrix<T>,
    transposed: bool,
    input_shape: (usize, usize),
    pub(crate) left_tau: Vec<T::Real>,
    pub(crate) right_tau: Vec<T::Real>,
    pub(crate) left_phase: Vec<T>,
    pub(crate) right_phase: Vec<T>,
    pub(crate) main: Vec<T::Real>,
    pub(crate) off: Vec<T::Real>,
    pub(crate) reduced: bool,
}

impl<T: LinalgScalar> Workspace<T> {
    /// Capture a copy of `a`, taking the adjoint when `a` is wide.
    pub fn new(a: &impl MatrixRef<T>) -> Self {
        let mut ws = Self {
            work: DynMatrix::zeros(0, 0, T::zero()),
            transposed: false,
            input_shape: (0, 0),
            left_tau: Vec::new(),
            right_tau: Vec::new(),
            left_phase: Vec::new(),
            right_phase: Vec::new(),
            main: Vec::new(),
            off: Vec::new(),
            reduced: false,
        };
        ws.capture(a);
        ws
    }

    /// Replace the working copy with `a`, dropping any previous reduction.
    pub fn capture(&mut self, a: &impl MatrixRef<T>) {
        self.reset();
        let (m, n) = (a.nrows(), a.ncols());
        self.input_shape = (m, n);
        self.transposed = m < n;
        self.work = if self.transposed {
            DynMatrix::from_fn(n, m, |i, j| a.get(j, i).conj())
        } else {
            DynMatrix::from_fn(m, n, |i, j| *a.get(i, j))
        };
    }

    /// Clear the buffer and every derived array.
    pub fn reset(&mut self) {
        self.work.clear();
        self.transposed = false;
        self.input_shape = (0, 0);
        self.left_tau.clear();
        self.right_tau.clear();
        self.left_phase.clear();
        self.right_phase.clear();
        self.main.clear();
        self.off.clear();
        self.reduced = false;
    }

    /// Whether [`bidiagonalize`](super::bidiagonalize) has run on the current copy.
    #[inline]
    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    /// Whether the working copy is the adjoint of the input.
    #[inline]
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    /// Shape of the captured input, before any reorientation.
    #[inline]
    pub fn input_shape(&self) -> (usize, usize) {
        self.input_shape
    }

    /// Rows of the working copy (the larger input dimension).
    #[inline]
    pub fn nrows(&self) -> usize {
        self.work.nrows()
    }

    /// Columns of the working copy: `min(m, n)`, the number of singular values.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.work.ncols()
    }

    /// Main diagonal of the bidiagonal form (length `min(m, n)`, non-negative).
    pub fn main_diagonal(&self) -> Result<&[T::Real], LinalgError> {
        self.ensure_reduced()?;
        Ok(&self.main)
    }

    /// Superdiagonal of the bidiagonal form (length `min(m, n) - 1`, non-negative).
    pub fn super_diagonal(&self) -> Result<&[T::Real], LinalgError> {
        self.ensure_reduced()?;
        let r = self.main.len();
        Ok(&self.off[..r.saturating_sub(1)])
    }

    /// The bidiagonal form as an explicit `r × r` real matrix.
    pub fn bidiagonal(&self) -> Result<DynMatrix<T::Real>, LinalgError> {
        self.ensure_reduced()?;
        let r = self.main.len();
        let mut b = DynMatrix::zeros(r, r, <T::Real as Zero>::zero());
        for k in 0..r {
            b[(k, k)] = self.main[k];
            if k + 1 < r {
                b[(k, k + 1)] = self.off[k];
            }
        }
        Ok(b)
    }

    /// Left orthogonal factor of the reduction, in the working orientation.
    ///
    /// `Thin` gives the leading `min(m, n)` columns, `Full` the square factor.
    pub fn q1(&self, shape: FactorShape) -> Result<DynMatrix<T>, LinalgError> {
        self.ensure_reduced()?;
        let cols = match shape {
            FactorShape::Thin => self.ncols(),
            FactorShape::Full => self.nrows(),
        };
        Ok(accumulate_left(self, cols))
    }

    /// Right orthogonal factor of the reduction (`min(m, n)` square).
    pub fn q2(&self) -> Result<DynMatrix<T>, LinalgError> {
        self.ensure_reduced()?;
        Ok(accumulate_right(self))
    }

    fn ensure_reduced(&self) -> Result<(), LinalgError> {
        if self.reduced {
            Ok(())
        } else {
            Err(LinalgError::NotComputed)
        }
    }
}

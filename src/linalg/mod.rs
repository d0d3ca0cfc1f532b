//! Singular value decomposition engine.
//!
//! The pipeline, leaves first:
//!
//! - [`elementary`]: Householder reflectors and Givens plane rotations
//!   applied in place to any [`MatrixMut`](crate::traits::MatrixMut).
//! - [`Workspace`]: the working copy of the input in canonical orientation
//!   (rows ≥ columns), holding the packed reflectors after reduction.
//! - [`bidiagonalize`]: two-sided Householder reduction to a real upper
//!   bidiagonal matrix.
//! - [`diagonalize`](diagonalize::diagonalize): Golub-Kahan-Reinsch implicit-shift
//!   iteration driving the bidiagonal to diagonal form, reporting every
//!   rotation to a pair of [`RotationSink`]s.
//! - [`Svd`]: the immutable result with U, Σ, V and derived queries
//!   (rank, condition number, pseudo-inverse, least squares).
//! - [`SvdSolver`]: a reusable stateful front end with
//!   `decompose` / `is_computed` / `reset`.

pub(crate) mod bidiag;
pub mod diagonalize;
pub mod elementary;
mod options;
#[cfg(feature = "parallel")]
pub(crate) mod parallel;
mod solver;
pub(crate) mod svd;
mod workspace;

pub use bidiag::bidiagonalize;
pub use diagonalize::{NoAccumulation, PlaneOp, RotationLog, RotationSink};
pub use options::{FactorShape, SvdOptions};
pub use solver::SvdSolver;
pub use svd::Svd;
pub use workspace::Workspace;

use thiserror::Error;

/// Errors from the decomposition engine.
///
/// Rank deficiency is never an error: it shows up as (near-)zero singular
/// values and is queried through [`Svd::rank`].
///
/// ```
/// use densvd::DynMatrix;
/// use densvd::linalg::{LinalgError, SvdSolver};
///
/// let solver = SvdSolver::<f64>::new();
/// assert_eq!(solver.singular_values().unwrap_err(), LinalgError::NotComputed);
///
/// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 0.0, 0.0, 1.0]);
/// let svd = a.svd().unwrap();
/// let rhs = DynMatrix::zeros(3, 1, 0.0);
/// assert!(matches!(svd.solve(&rhs), Err(LinalgError::DimensionMismatch { .. })));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinalgError {
    /// Operand shapes are not conformant.
    #[error("dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Actual `(rows, cols)`.
        got: (usize, usize),
    },
    /// Iterative algorithm did not converge within the iteration budget.
    #[error("iterative algorithm did not converge")]
    ConvergenceFailure,
    /// No successful decomposition is available.
    #[error("decomposition has not been computed")]
    NotComputed,
    /// Only singular values were computed; the singular vectors are unavailable.
    #[error("singular vectors were not computed")]
    VectorsNotComputed,
}

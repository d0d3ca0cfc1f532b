use alloc::vec::Vec;

use log::debug;

use crate::dynmatrix::DynMatrix;
use crate::traits::{LinalgScalar, MatrixRef};

use super::svd::{condition_of, count_above, effective_tolerance};
use super::{LinalgError, Svd, SvdOptions};

#[derive(Debug, Clone)]
enum State<T: LinalgScalar> {
    Empty,
    Failed(LinalgError),
    ValuesOnly {
        values: Vec<T::Real>,
        shape: (usize, usize),
        tolerance: Option<T::Real>,
    },
    Full(Svd<T>),
}

/// Reusable decomposition front end.
///
/// Holds at most one result. Every query fails with
/// [`LinalgError::NotComputed`] until a decomposition succeeds, and again
/// after [`reset`](Self::reset) or a failed decomposition. After
/// [`compute_values_only`](Self::compute_values_only) the factor queries
/// fail with [`LinalgError::VectorsNotComputed`] while the scalar queries
/// still answer.
///
/// ```
/// use densvd::{DynMatrix, LinalgError, SvdSolver};
///
/// let mut solver = SvdSolver::new();
/// assert!(!solver.is_computed());
///
/// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 0.0, 0.0, 0.0]);
/// solver.decompose(&a).unwrap();
/// assert_eq!(solver.singular_values().unwrap(), &[1.0, 0.0]);
/// assert_eq!(solver.rank().unwrap(), 1);
///
/// solver.reset();
/// assert_eq!(solver.rank(), Err(LinalgError::NotComputed));
/// ```
#[derive(Debug, Clone)]
pub struct SvdSolver<T: LinalgScalar> {
    options: SvdOptions,
    state: State<T>,
}

impl<T: LinalgScalar> Default for SvdSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LinalgScalar> SvdSolver<T> {
    pub fn new() -> Self {
        Self::with_options(SvdOptions::default())
    }

    pub fn with_options(options: SvdOptions) -> Self {
        Self {
            options,
            state: State::Empty,
        }
    }

    pub fn options(&self) -> &SvdOptions {
        &self.options
    }

    /// Change the options for subsequent decompositions. The current result,
    /// if any, is kept.
    pub fn set_options(&mut self, options: SvdOptions) {
        self.options = options;
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Decompose `a`, replacing any previous result.
    ///
    /// On failure the solver is left without a result and
    /// [`last_error`](Self::last_error) reports why.
    pub fn decompose(&mut self, a: &impl MatrixRef<T>) -> Result<(), LinalgError> {
        self.reset();
        match Svd::with_options(a, &self.options) {
            Ok(svd) => {
                self.state = State::Full(svd);
                Ok(())
            }
            Err(err) => {
                debug!("decomposition failed: {}", err);
                self.state = State::Failed(err);
                Err(err)
            }
        }
    }

    /// Compute only the singular values of `a`, replacing any previous result.
    pub fn compute_values_only(&mut self, a: &impl MatrixRef<T>) -> Result<(), LinalgError> {
        self.reset();
        match Svd::singular_values_only_with(a, &self.options) {
            Ok(values) => {
                self.state = State::ValuesOnly {
                    values,
                    shape: (a.nrows(), a.ncols()),
                    tolerance: self.options.rank_tolerance_as(),
                };
                Ok(())
            }
            Err(err) => {
                debug!("values-only decomposition failed: {}", err);
                self.state = State::Failed(err);
                Err(err)
            }
        }
    }

    /// Whether a result (full or values-only) is available.
    pub fn is_computed(&self) -> bool {
        matches!(self.state, State::ValuesOnly { .. } | State::Full(_))
    }

    /// Whether the singular vectors are available.
    pub fn has_vectors(&self) -> bool {
        matches!(self.state, State::Full(_))
    }

    /// Drop the current result.
    pub fn reset(&mut self) {
        self.state = State::Empty;
    }

    /// The error of the most recent decomposition, if it failed.
    pub fn last_error(&self) -> Option<LinalgError> {
        match self.state {
            State::Failed(err) => Some(err),
            _ => None,
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// The full decomposition.
    pub fn result(&self) -> Result<&Svd<T>, LinalgError> {
        match &self.state {
            State::Full(svd) => Ok(svd),
            State::ValuesOnly { .. } => Err(LinalgError::VectorsNotComputed),
            State::Empty | State::Failed(_) => Err(LinalgError::NotComputed),
        }
    }

    /// Take the full decomposition out, leaving the solver empty.
    pub fn into_result(self) -> Result<Svd<T>, LinalgError> {
        match self.state {
            State::Full(svd) => Ok(svd),
            State::ValuesOnly { .. } => Err(LinalgError::VectorsNotComputed),
            State::Empty | State::Failed(_) => Err(LinalgError::NotComputed),
        }
    }

    pub fn singular_values(&self) -> Result<&[T::Real], LinalgError> {
        match &self.state {
            State::Full(svd) => Ok(svd.singular_values()),
            State::ValuesOnly { values, .. } => Ok(values),
            State::Empty | State::Failed(_) => Err(LinalgError::NotComputed),
        }
    }

    pub fn u(&self) -> Result<&DynMatrix<T>, LinalgError> {
        self.result().map(Svd::u)
    }

    pub fn v(&self) -> Result<&DynMatrix<T>, LinalgError> {
        self.result().map(Svd::v)
    }

    /// `Σ` as a diagonal matrix; needs a full decomposition.
    pub fn sigma(&self) -> Result<DynMatrix<T::Real>, LinalgError> {
        self.result().map(Svd::sigma)
    }

    pub fn rank(&self) -> Result<usize, LinalgError> {
        match &self.state {
            State::Full(svd) => Ok(svd.rank()),
            State::ValuesOnly {
                values,
                shape,
                tolerance,
            } => Ok(count_above(
                values,
                effective_tolerance(values, *shape, *tolerance),
            )),
            State::Empty | State::Failed(_) => Err(LinalgError::NotComputed),
        }
    }

    pub fn condition_number(&self) -> Result<T::Real, LinalgError> {
        self.singular_values().map(condition_of)
    }

    pub fn pseudo_inverse(&self) -> Result<DynMatrix<T>, LinalgError> {
        self.result().map(Svd::pseudo_inverse)
    }

    pub fn solve(&self, rhs: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        self.result()?.solve(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DynMatrix<f64> {
        DynMatrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
    }

    #[test]
    fn empty_solver_refuses_queries() {
        let solver = SvdSolver::<f64>::new();
        assert!(!solver.is_computed());
        assert!(!solver.has_vectors());
        assert_eq!(solver.singular_values().unwrap_err(), LinalgError::NotComputed);
        assert_eq!(solver.u().unwrap_err(), LinalgError::NotComputed);
        assert_eq!(solver.rank(), Err(LinalgError::NotComputed));
        assert_eq!(solver.condition_number(), Err(LinalgError::NotComputed));
        assert!(solver.last_error().is_none());
    }

    #[test]
    fn values_only_refuses_vectors() {
        let mut solver = SvdSolver::new();
        solver.compute_values_only(&sample()).unwrap();
        assert!(solver.is_computed());
        assert!(!solver.has_vectors());
        assert_eq!(solver.singular_values().unwrap().len(), 2);
        assert_eq!(solver.rank(), Ok(2));
        assert!(solver.condition_number().unwrap() > 1.0);
        assert_eq!(solver.v().unwrap_err(), LinalgError::VectorsNotComputed);
        assert_eq!(solver.sigma().unwrap_err(), LinalgError::VectorsNotComputed);
        assert_eq!(
            solver.pseudo_inverse().unwrap_err(),
            LinalgError::VectorsNotComputed
        );
    }

    #[test]
    fn failure_clears_previous_result() {
        let mut solver = SvdSolver::new();
        solver.decompose(&sample()).unwrap();
        assert!(solver.has_vectors());

        solver.set_options(SvdOptions::default().with_max_steps_per_value(0));
        let err = solver.decompose(&sample()).unwrap_err();
        assert_eq!(err, LinalgError::ConvergenceFailure);
        assert!(!solver.is_computed());
        assert_eq!(solver.last_error(), Some(LinalgError::ConvergenceFailure));
        assert_eq!(solver.u().unwrap_err(), LinalgError::NotComputed);
    }

    #[test]
    fn into_result_hands_over_decomposition() {
        let mut solver = SvdSolver::new();
        solver.decompose(&sample()).unwrap();
        let svd = solver.into_result().unwrap();
        assert_eq!(svd.shape(), (3, 2));
    }
}

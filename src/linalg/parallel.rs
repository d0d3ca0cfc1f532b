//! Two-threaded accumulation of the orthogonal factors.
//!
//! The diagonalization records its rotations into two logs without touching
//! any matrix; afterwards the left and right factors are formed and the logs
//! replayed on either side of a `rayon::join`. The replay applies the same
//! operations in the same order, so the result is bitwise identical to
//! direct accumulation.

use log::trace;

use crate::dynmatrix::DynMatrix;
use crate::traits::LinalgScalar;

use super::diagonalize::{diagonalize, RotationLog};
use super::{LinalgError, SvdOptions, Workspace};

pub(crate) fn accumulate<T: LinalgScalar>(
    ws: &Workspace<T>,
    s: &mut [T::Real],
    e: &mut [T::Real],
    opts: &SvdOptions,
) -> Result<(DynMatrix<T>, DynMatrix<T>, usize), LinalgError> {
    let mut left = RotationLog::new();
    let mut right = RotationLog::new();
    let steps = diagonalize(s, e, &mut left, &mut right, opts.max_steps_per_value)?;
    trace!(
        "replaying {} left and {} right operations in parallel",
        left.len(),
        right.len()
    );

    let (q1, q2) = rayon::join(
        || {
            let mut q1 = ws.q1(opts.factors)?;
            left.replay(&mut q1);
            Ok::<_, LinalgError>(q1)
        },
        || {
            let mut q2 = ws.q2()?;
            right.replay(&mut q2);
            Ok::<_, LinalgError>(q2)
        },
    );
    Ok((q1?, q2?, steps))
}

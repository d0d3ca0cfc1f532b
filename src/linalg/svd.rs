use alloc::vec::Vec;

use log::debug;
use num_traits::{Float, One, Zero};

use crate::dynmatrix::DynMatrix;
use crate::traits::{FloatScalar, LinalgScalar, MatrixRef};

use super::diagonalize::{diagonalize, NoAccumulation};
use super::{bidiagonalize, LinalgError, SvdOptions, Workspace};

// ── Shared scalar queries ───────────────────────────────────────────

/// Cutoff below which a singular value counts as zero: the override when
/// given, otherwise `σ₀ · max(m, n) · ε`.
pub(crate) fn effective_tolerance<R: FloatScalar>(
    values: &[R],
    shape: (usize, usize),
    tol: Option<R>,
) -> R {
    tol.unwrap_or_else(|| {
        let dim: R = num_traits::cast(shape.0.max(shape.1)).unwrap_or_else(R::max_value);
        values.first().copied().unwrap_or_else(R::zero) * dim * R::epsilon()
    })
}

/// Number of values strictly above `tol`.
pub(crate) fn count_above<R: FloatScalar>(values: &[R], tol: R) -> usize {
    values.iter().filter(|&&s| s > tol).count()
}

/// `σ_max / σ_min`; one for no values, infinity when `σ_min` is zero.
pub(crate) fn condition_of<R: FloatScalar>(values: &[R]) -> R {
    match (values.first(), values.last()) {
        (Some(&max), Some(&min)) => {
            if min == R::zero() {
                R::infinity()
            } else {
                max / min
            }
        }
        _ => R::one(),
    }
}

// ── Decomposition ───────────────────────────────────────────────────

/// Singular value decomposition `A = U · Σ · Vᴴ` of a dense m × n matrix.
///
/// The singular values are non-negative and sorted descending. With the
/// default thin factors `U` is m × r and `V` is n × r, `r = min(m, n)`;
/// [`FactorShape::Full`](super::FactorShape::Full) gives square factors.
/// Wide inputs are decomposed through their adjoint and the factors swapped
/// back, so every shape is accepted.
///
/// # Example
///
/// ```
/// use densvd::{DynMatrix, Svd};
///
/// let a = DynMatrix::from_rows(2, 3, &[3.0_f64, 2.0, 2.0, 2.0, 3.0, -2.0]);
/// let svd = Svd::new(&a).unwrap();
/// let sv = svd.singular_values();
/// assert!((sv[0] - 5.0).abs() < 1e-12);
/// assert!((sv[1] - 3.0).abs() < 1e-12);
/// assert_eq!(svd.u().shape(), (2, 2));
/// assert_eq!(svd.v().shape(), (3, 2));
/// assert!(svd.reconstruct().max_abs_diff(&a) < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Svd<T: LinalgScalar> {
    u: DynMatrix<T>,
    singular_values: Vec<T::Real>,
    v: DynMatrix<T>,
    shape: (usize, usize),
    transposed: bool,
    tolerance: Option<T::Real>,
    qr_steps: usize,
}

impl<T: LinalgScalar> Svd<T> {
    /// Decompose `a` with default options.
    ///
    /// Returns `Err(ConvergenceFailure)` if the bidiagonal iteration stalls
    /// on some singular value.
    pub fn new(a: &impl MatrixRef<T>) -> Result<Self, LinalgError> {
        Self::with_options(a, &SvdOptions::default())
    }

    /// Decompose `a` with explicit options.
    pub fn with_options(a: &impl MatrixRef<T>, opts: &SvdOptions) -> Result<Self, LinalgError> {
        let shape = (a.nrows(), a.ncols());
        let mut ws = Workspace::new(a);
        debug!(
            "svd {}x{}{}, {:?} factors",
            shape.0,
            shape.1,
            if ws.is_transposed() { " via adjoint" } else { "" },
            opts.factors
        );
        bidiagonalize(&mut ws);

        let mut s = ws.main.clone();
        let mut e = ws.off.clone();

        #[cfg(feature = "parallel")]
        let (q1, q2, qr_steps) = if opts.parallel_accumulation {
            super::parallel::accumulate(&ws, &mut s, &mut e, opts)?
        } else {
            accumulate_direct(&ws, &mut s, &mut e, opts)?
        };
        #[cfg(not(feature = "parallel"))]
        let (q1, q2, qr_steps) = accumulate_direct(&ws, &mut s, &mut e, opts)?;

        debug!(
            "svd {}x{} done: {} QR sweeps, σ₀ = {:?}",
            shape.0,
            shape.1,
            qr_steps,
            s.first()
        );

        // Aᴴ = Q1 Σ Q2ᴴ means A = Q2 Σ Q1ᴴ
        let transposed = ws.is_transposed();
        let (u, v) = if transposed { (q2, q1) } else { (q1, q2) };
        Ok(Self {
            u,
            singular_values: s,
            v,
            shape,
            transposed,
            tolerance: opts.rank_tolerance_as(),
            qr_steps,
        })
    }

    /// Compute only the singular values (no U/V accumulation).
    ///
    /// ```
    /// use densvd::{DynMatrix, Svd};
    ///
    /// let a = DynMatrix::from_rows(2, 2, &[3.0_f64, 0.0, 0.0, 4.0]);
    /// let sv = Svd::singular_values_only(&a).unwrap();
    /// assert_eq!(sv, [4.0, 3.0]);
    /// ```
    pub fn singular_values_only(a: &impl MatrixRef<T>) -> Result<Vec<T::Real>, LinalgError> {
        Self::singular_values_only_with(a, &SvdOptions::default())
    }

    /// [`singular_values_only`](Self::singular_values_only) with explicit options.
    pub fn singular_values_only_with(
        a: &impl MatrixRef<T>,
        opts: &SvdOptions,
    ) -> Result<Vec<T::Real>, LinalgError> {
        let mut ws = Workspace::new(a);
        debug!("singular values of {}x{}", a.nrows(), a.ncols());
        bidiagonalize(&mut ws);
        let mut s = ws.main.clone();
        let mut e = ws.off.clone();
        let steps = diagonalize(
            &mut s,
            &mut e,
            &mut NoAccumulation,
            &mut NoAccumulation,
            opts.max_steps_per_value,
        )?;
        debug!("singular values done: {} QR sweeps", steps);
        Ok(s)
    }

    // ── Factors ─────────────────────────────────────────────────────

    /// The singular values, sorted descending.
    #[inline]
    pub fn singular_values(&self) -> &[T::Real] {
        &self.singular_values
    }

    /// Left singular vectors as columns.
    #[inline]
    pub fn u(&self) -> &DynMatrix<T> {
        &self.u
    }

    /// Right singular vectors as columns.
    #[inline]
    pub fn v(&self) -> &DynMatrix<T> {
        &self.v
    }

    /// `Vᴴ`: rows are the (conjugated) right singular vectors.
    pub fn vt(&self) -> DynMatrix<T> {
        self.v.adjoint()
    }

    /// `Σ` as an r × r real diagonal matrix.
    pub fn sigma(&self) -> DynMatrix<T::Real> {
        DynMatrix::from_diag(&self.singular_values)
    }

    /// Shape of the decomposed matrix.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Whether the input was wide and decomposed through its adjoint.
    #[inline]
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    /// Implicit QR sweeps the diagonalization needed.
    #[inline]
    pub fn qr_steps(&self) -> usize {
        self.qr_steps
    }

    // ── Rank and conditioning ───────────────────────────────────────

    /// Cutoff used by [`rank`](Self::rank) and the pseudo-inverse.
    pub fn rank_tolerance(&self) -> T::Real {
        effective_tolerance(&self.singular_values, self.shape, self.tolerance)
    }

    /// Numerical rank: singular values above [`rank_tolerance`](Self::rank_tolerance).
    pub fn rank(&self) -> usize {
        count_above(&self.singular_values, self.rank_tolerance())
    }

    /// Number of singular values above `tol`.
    pub fn rank_with_tol(&self, tol: T::Real) -> usize {
        count_above(&self.singular_values, tol)
    }

    /// Whether the rank equals `min(m, n)`.
    pub fn is_full_rank(&self) -> bool {
        self.rank() == self.singular_values.len()
    }

    /// Condition number `σ_max / σ_min`.
    ///
    /// Returns infinity if the smallest singular value is zero.
    pub fn condition_number(&self) -> T::Real {
        condition_of(&self.singular_values)
    }

    // ── Norms ───────────────────────────────────────────────────────

    /// Spectral norm `σ₀`.
    pub fn operator_norm(&self) -> T::Real {
        self.singular_values
            .first()
            .copied()
            .unwrap_or_else(<T::Real as Zero>::zero)
    }

    /// `sqrt(Σ σᵢ²)`.
    pub fn frobenius_norm(&self) -> T::Real {
        self.singular_values
            .iter()
            .fold(<T::Real as Zero>::zero(), |acc, &s| Float::hypot(acc, s))
    }

    /// Trace norm `Σ σᵢ`.
    pub fn nuclear_norm(&self) -> T::Real {
        self.ky_fan_norm(self.singular_values.len())
    }

    /// Sum of the `k` largest singular values.
    pub fn ky_fan_norm(&self, k: usize) -> T::Real {
        self.singular_values
            .iter()
            .take(k)
            .fold(<T::Real as Zero>::zero(), |acc, &s| acc + s)
    }

    // ── Derived matrices ────────────────────────────────────────────

    /// Moore-Penrose pseudo-inverse `V · Σ⁺ · Uᴴ` (n × m).
    ///
    /// Singular values at or below the rank tolerance are treated as zero.
    ///
    /// ```
    /// use densvd::DynMatrix;
    ///
    /// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 0.0, 2.0, 0.0, 0.0]);
    /// let pinv = a.svd().unwrap().pseudo_inverse();
    /// assert_eq!(pinv.shape(), (2, 3));
    /// assert!((pinv[(0, 0)] - 1.0).abs() < 1e-14);
    /// assert!((pinv[(1, 1)] - 0.5).abs() < 1e-14);
    /// ```
    pub fn pseudo_inverse(&self) -> DynMatrix<T> {
        let (ur, vr) = self.thin_factors();
        let mut w = vr;
        self.scale_by_inverse(&mut w);
        &w * &ur.adjoint()
    }

    /// Minimum-norm least-squares solution `X` of `A · X ≈ rhs`.
    ///
    /// `rhs` must have `m` rows; it may have any number of columns.
    ///
    /// ```
    /// use densvd::DynMatrix;
    ///
    /// // Overdetermined: fit y = c0 + c1·t through three points on a line
    /// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 1.0, 1.0, 1.0, 2.0]);
    /// let y = DynMatrix::from_rows(3, 1, &[1.0, 3.0, 5.0]);
    /// let c = a.svd().unwrap().solve(&y).unwrap();
    /// assert!((c[(0, 0)] - 1.0).abs() < 1e-12);
    /// assert!((c[(1, 0)] - 2.0).abs() < 1e-12);
    /// ```
    pub fn solve(&self, rhs: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        let (m, _) = self.shape;
        if rhs.nrows() != m {
            return Err(LinalgError::DimensionMismatch {
                expected: (m, rhs.ncols()),
                got: rhs.shape(),
            });
        }
        let (ur, vr) = self.thin_factors();
        let mut y = &ur.adjoint() * rhs;
        // y ← Σ⁺ y, row by row
        let tol = self.rank_tolerance();
        for (i, &s) in self.singular_values.iter().enumerate() {
            let inv = if s > tol {
                T::from_real(<T::Real as One>::one() / s)
            } else {
                T::zero()
            };
            y.scale_row(i, inv);
        }
        Ok(&vr * &y)
    }

    /// `V · (Σ⁺)² · Vᴴ`, the covariance of a least-squares fit with unit
    /// residual variance (n × n).
    pub fn covariance(&self) -> DynMatrix<T> {
        let (_, vr) = self.thin_factors();
        let mut w = vr.clone();
        self.scale_by_inverse(&mut w);
        self.scale_by_inverse(&mut w);
        &w * &vr.adjoint()
    }

    /// `U · Σ · Vᴴ` (m × n).
    pub fn reconstruct(&self) -> DynMatrix<T> {
        let (mut ur, vr) = self.thin_factors();
        for (j, &s) in self.singular_values.iter().enumerate() {
            ur.scale_col(j, T::from_real(s));
        }
        &ur * &vr.adjoint()
    }

    /// The leading r columns of U and V.
    fn thin_factors(&self) -> (DynMatrix<T>, DynMatrix<T>) {
        let r = self.singular_values.len();
        (self.u.leading_columns(r), self.v.leading_columns(r))
    }

    /// Scale column j of `w` by `1/σⱼ`, or zero it below the tolerance.
    fn scale_by_inverse(&self, w: &mut DynMatrix<T>) {
        let tol = self.rank_tolerance();
        for (j, &s) in self.singular_values.iter().enumerate() {
            let inv = if s > tol {
                T::from_real(<T::Real as One>::one() / s)
            } else {
                T::zero()
            };
            w.scale_col(j, inv);
        }
    }
}

/// Diagonalize while rotating the formed factors in place.
fn accumulate_direct<T: LinalgScalar>(
    ws: &Workspace<T>,
    s: &mut [T::Real],
    e: &mut [T::Real],
    opts: &SvdOptions,
) -> Result<(DynMatrix<T>, DynMatrix<T>, usize), LinalgError> {
    let mut q1 = ws.q1(opts.factors)?;
    let mut q2 = ws.q2()?;
    let steps = diagonalize(s, e, &mut q1, &mut q2, opts.max_steps_per_value)?;
    Ok((q1, q2, steps))
}

// ── Convenience methods ─────────────────────────────────────────────

impl<T: LinalgScalar> DynMatrix<T> {
    /// Singular value decomposition with default options.
    ///
    /// ```
    /// use densvd::DynMatrix;
    ///
    /// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 0.0, 1.0, 0.0, 0.0]);
    /// let svd = a.svd().unwrap();
    /// assert!((svd.singular_values()[0] - 1.0).abs() < 1e-10);
    /// assert!((svd.singular_values()[1] - 1.0).abs() < 1e-10);
    /// ```
    pub fn svd(&self) -> Result<Svd<T>, LinalgError> {
        Svd::new(self)
    }

    /// Singular values only (no U/V computation).
    ///
    /// ```
    /// use densvd::DynMatrix;
    ///
    /// let a = DynMatrix::from_rows(2, 2, &[3.0_f64, 0.0, 0.0, 4.0]);
    /// let sv = a.singular_values_only().unwrap();
    /// assert!((sv[0] - 4.0).abs() < 1e-10);
    /// assert!((sv[1] - 3.0).abs() < 1e-10);
    /// ```
    pub fn singular_values_only(&self) -> Result<Vec<T::Real>, LinalgError> {
        Svd::singular_values_only(self)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

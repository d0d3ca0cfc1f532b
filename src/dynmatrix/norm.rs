use num_traits::{Float, Zero};

use crate::traits::LinalgScalar;

use super::DynMatrix;

// ── Matrix norms ────────────────────────────────────────────────────

impl<T: LinalgScalar> DynMatrix<T> {
    /// Frobenius norm, accumulated with `hypot` so large entries do not
    /// overflow the running sum.
    ///
    /// ```
    /// use densvd::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
    /// assert!((m.frobenius_norm() - 30.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T::Real {
        self.data
            .iter()
            .fold(<T::Real as Zero>::zero(), |acc, &x| acc.hypot(x.modulus()))
    }

    /// Largest element modulus.
    ///
    /// ```
    /// use densvd::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, -7.0, 3.0, 4.0]);
    /// assert_eq!(m.max_abs(), 7.0);
    /// ```
    pub fn max_abs(&self) -> T::Real {
        self.data
            .iter()
            .fold(<T::Real as Zero>::zero(), |acc, &x| acc.max(x.modulus()))
    }

    /// Largest element-wise modulus of `self - other`.
    ///
    /// Panics on shape mismatch.
    pub fn max_abs_diff(&self, other: &Self) -> T::Real {
        assert_eq!(
            self.shape(),
            other.shape(),
            "dimension mismatch: {}x{} vs {}x{}",
            self.nrows, self.ncols, other.nrows, other.ncols,
        );
        self.data
            .iter()
            .zip(other.data.iter())
            .fold(<T::Real as Zero>::zero(), |acc, (&a, &b)| {
                acc.max((a - b).modulus())
            })
    }

    /// Whether every element is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|&x| x.modulus().is_finite())
    }
}

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::FloatScalar;

/// Which orthogonal factors to form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FactorShape {
    /// `U` is m × r and `V` is n × r, with `r = min(m, n)`.
    #[default]
    Thin,
    /// `U` is m × m and `V` is n × n.
    Full,
}

/// Knobs for a decomposition.
///
/// ```
/// use densvd::{DynMatrix, FactorShape, Svd, SvdOptions};
///
/// let opts = SvdOptions::default()
///     .with_factors(FactorShape::Full)
///     .with_rank_tolerance(1e-8);
/// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 0.0, 1.0, 0.0, 0.0]);
/// let svd = Svd::with_options(&a, &opts).unwrap();
/// assert_eq!(svd.u().shape(), (3, 3));
/// assert_eq!(svd.rank(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SvdOptions {
    /// Passes allowed on one singular value before giving up.
    pub max_steps_per_value: usize,
    /// Thin or full orthogonal factors.
    pub factors: FactorShape,
    /// Absolute cutoff below which a singular value counts as zero for rank
    /// and pseudo-inverse. `None` uses `σ₀ · max(m, n) · ε`.
    pub rank_tolerance: Option<f64>,
    /// Record the rotations and form `U`, `V` on separate threads afterwards.
    /// Ignored without the `parallel` feature.
    pub parallel_accumulation: bool,
}

impl Default for SvdOptions {
    fn default() -> Self {
        Self {
            max_steps_per_value: 75,
            factors: FactorShape::Thin,
            rank_tolerance: None,
            parallel_accumulation: false,
        }
    }
}

impl SvdOptions {
    pub fn with_max_steps_per_value(mut self, steps: usize) -> Self {
        self.max_steps_per_value = steps;
        self
    }

    pub fn with_factors(mut self, factors: FactorShape) -> Self {
        self.factors = factors;
        self
    }

    pub fn with_rank_tolerance(mut self, tol: f64) -> Self {
        self.rank_tolerance = Some(tol);
        self
    }

    pub fn with_parallel_accumulation(mut self, on: bool) -> Self {
        self.parallel_accumulation = on;
        self
    }

    /// The rank tolerance converted to the working precision.
    pub(crate) fn rank_tolerance_as<R: FloatScalar>(&self) -> Option<R> {
        self.rank_tolerance.and_then(num_traits::cast)
    }
}

use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

#[cfg(feature = "complex")]
use num_complex::Complex;

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds. `Send + Sync`
/// lets the two orthogonal factors be accumulated on separate threads.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num + Send + Sync {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num + Send + Sync> Scalar for T {}

/// Trait for real floating-point elements.
///
/// Singular values, rotation parameters and tolerances live in this type.
/// Implies `LinalgScalar<Real = Self>` since real floats are their own real type.
pub trait FloatScalar: Scalar + Float + LinalgScalar<Real = Self> {}

impl<T: Scalar + Float + LinalgScalar<Real = T>> FloatScalar for T {}

/// Scalar algebra required by the decomposition engine.
///
/// Covers both real floats (`f32`, `f64`) and complex numbers (`Complex<f32>`,
/// `Complex<f64>`). Arithmetic comes from [`Scalar`]; this trait adds the
/// conjugate, modulus, unit phase and the negligibility test.
pub trait LinalgScalar: Scalar {
    /// The real component type (`Self` for reals, `T` for `Complex<T>`).
    type Real: FloatScalar;

    /// Absolute value / modulus: `|z|` for complex, `.abs()` for real.
    fn modulus(self) -> Self::Real;

    /// Complex conjugate (identity for reals).
    fn conj(self) -> Self;

    /// Real part.
    fn re(self) -> Self::Real;

    /// Machine epsilon of the underlying real type.
    fn lepsilon() -> Self::Real;

    /// Promote a real value into `Self`.
    fn from_real(r: Self::Real) -> Self;

    /// Unit-modulus phase `z / |z|`, or one when `z` is zero.
    ///
    /// For reals this is the sign, with `+1` for zero.
    fn phase(self) -> Self {
        let m = self.modulus();
        if m == <Self::Real as Zero>::zero() {
            Self::one()
        } else {
            self / Self::from_real(m)
        }
    }

    /// Smallest real `x` such that `1 / x` does not overflow, divided by
    /// epsilon. Values at or below this are treated as zero.
    fn lsafe_min() -> Self::Real {
        <Self::Real as Float>::min_positive_value() / Self::lepsilon()
    }

    /// `true` when `|self|` is negligible next to `scale`:
    /// `|self| <= safe_min + eps * scale`.
    fn is_small(self, scale: Self::Real) -> bool {
        self.modulus() <= Self::lsafe_min() + Self::lepsilon() * scale
    }
}

macro_rules! impl_linalg_scalar_real {
    ($($t:ty),*) => {
        $(
            impl LinalgScalar for $t {
                type Real = $t;

                #[inline] fn modulus(self) -> $t { Float::abs(self) }
                #[inline] fn conj(self) -> $t { self }
                #[inline] fn re(self) -> $t { self }
                #[inline] fn lepsilon() -> $t { <$t as Float>::epsilon() }
                #[inline] fn from_real(r: $t) -> $t { r }
            }
        )*
    };
}

impl_linalg_scalar_real!(f32, f64);

#[cfg(feature = "complex")]
impl<T: FloatScalar> LinalgScalar for Complex<T> {
    type Real = T;

    #[inline]
    fn modulus(self) -> T {
        self.re.hypot(self.im)
    }

    #[inline]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }

    #[inline]
    fn re(self) -> T {
        self.re
    }

    #[inline]
    fn lepsilon() -> T {
        T::epsilon()
    }

    #[inline]
    fn from_real(r: T) -> Self {
        Complex::new(r, T::zero())
    }
}

/// Read-only access to a matrix-like type.
///
/// Storage is column-major: every column is a contiguous slice.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// Column `col` from `row_start` to the last row, as a contiguous slice.
    fn col_as_slice(&self, col: usize, row_start: usize) -> &[T];
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling the in-place
/// transformations of the decomposition engine to work generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Mutable column `col` from `row_start` to the last row.
    fn col_as_mut_slice(&mut self, col: usize, row_start: usize) -> &mut [T];
}

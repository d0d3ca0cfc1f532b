//! # densvd
//!
//! Dense singular value decomposition in pure Rust, no-std compatible (with
//! `alloc`). Householder bidiagonalization followed by Golub-Kahan-Reinsch
//! implicit-shift iteration, for real and complex matrices of any shape.
//!
//! ## Quick start
//!
//! ```
//! use densvd::DynMatrix;
//!
//! let a = DynMatrix::from_rows(3, 2, &[
//!     1.0_f64, 2.0,
//!     3.0, 4.0,
//!     5.0, 6.0,
//! ]);
//! let svd = a.svd().unwrap();
//! let sv = svd.singular_values();
//! assert!(sv[0] > sv[1]);
//! assert!(svd.reconstruct().max_abs_diff(&a) < 1e-12);
//! assert_eq!(svd.rank(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`dynmatrix`]: Heap-allocated `DynMatrix<T>` with runtime dimensions and
//!   column-major `Vec<T>` storage. Implements [`MatrixRef`] / [`MatrixMut`],
//!   so every in-place transformation works on it directly.
//!
//! - [`linalg`]: The decomposition engine: elementary reflectors and
//!   rotations, the working store, bidiagonalization, the diagonalization
//!   iterator, the [`Svd`] result with its derived queries (rank, condition
//!   number, pseudo-inverse, least squares) and the stateful [`SvdSolver`].
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`]: real floats; singular values and rotations live here
//!   - [`LinalgScalar`]: real floats and complex numbers, used by the engine
//!   - [`MatrixRef`] / [`MatrixMut`]: generic read/write access for algorithms
//!
//! ## Complex matrices
//!
//! Enable the `complex` feature to decompose `Complex<f32>` / `Complex<f64>`
//! matrices. The phases of the complex Householder reflections are folded
//! into U and V, so the bidiagonal and the singular values stay real.
//!
//! ## Cargo features
//!
//! | Feature    | Default  | Description |
//! |------------|----------|-------------|
//! | `std`      | yes      | Hardware FPU via system libm, `std::error::Error` |
//! | `libm`     | baseline | Pure-Rust software float fallback |
//! | `complex`  | no       | `Complex<f32>` / `Complex<f64>` support via `num-complex` |
//! | `parallel` | no       | Form U and V on two threads via `rayon` |
//! | `serde`    | no       | `Serialize` / `Deserialize` for [`SvdOptions`] |
//! | `all`      | no       | All features |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dynmatrix;
pub mod linalg;
pub mod traits;

pub use dynmatrix::DynMatrix;
pub use linalg::{FactorShape, LinalgError, Svd, SvdOptions, SvdSolver};
pub use traits::{FloatScalar, LinalgScalar, MatrixMut, MatrixRef, Scalar};

#[cfg(feature = "complex")]
pub use num_complex::Complex;

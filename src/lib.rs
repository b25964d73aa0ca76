//! # denselin
//!
//! Dense matrix factorizations and the linear-system and least-squares
//! solvers built on them. No-std compatible (needs `alloc`).
//!
//! ## Quick start
//!
//! ```
//! use denselin::{DynMatrix, DynVector};
//!
//! // Solve a linear system Ax = b
//! let a = DynMatrix::from_rows(3, 3, &[
//!     2.0_f64, 1.0, -1.0,
//!     -3.0, -1.0, 2.0,
//!     -2.0, 1.0, 2.0,
//! ]);
//! let b = DynVector::from_slice(&[8.0, -11.0, -3.0]);
//! let x = a.solve(&b).unwrap(); // x = [2, 3, -1]
//! assert!((x[0] - 2.0).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`dynmatrix`] — Heap-allocated `DynMatrix<T>` with runtime dimensions.
//!   `Vec<T>` column-major storage. Implements [`MatrixRef`] / [`MatrixMut`],
//!   so the in-place kernels in [`linalg`] work on it directly.
//!   [`DynVector<T>`] newtype for single-index vector access. Arithmetic is
//!   spelled out (`matmul`, `matvec`, `transpose`, `sub`), with `&a * &b`
//!   and `&a - &b` as shorthand.
//!
//! - [`linalg`] — Factorizations and solvers:
//!   - [`linalg::Plu`]: Gaussian elimination with partial pivoting, `PA = LU`
//!   - [`linalg::Cholesky`]: `A = LL^T` for symmetric positive-definite `A`
//!   - [`linalg::HouseholderQr`]: full and reduced QR by reflections
//!   - [`linalg::GramSchmidtQr`]: reduced QR, classical or modified
//!   - [`linalg::solve()`]: picks a factorization from the shape of `A` and a
//!     caller hint, returns `x` with the residual norm
//!   - [`linalg::triangular_solve()`]: forward/back substitution
//!
//!   Free functions operate on `&mut impl MatrixMut<T>` for in-place use;
//!   the structs copy their input and never modify it.
//!
//! - [`traits`] — Element trait hierarchy:
//!   - [`Scalar`] — all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`] — real floats (`Scalar + Float`), used by every factorization
//!   - [`MatrixRef`] / [`MatrixMut`] — generic read/write access for algorithms
//!
//! ## Errors
//!
//! Numerical failures (zero pivot, dependent column, non-positive-definite
//! input) are returned as [`linalg::LinalgError`]. Shape mistakes such as a
//! non-square matrix passed to PLU are programmer errors and panic.
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Hardware FPU via system libm |
//! | `libm`    | no       | Pure-Rust software float fallback for `no_std` |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dynmatrix;
pub mod linalg;
pub mod traits;

pub use dynmatrix::{DynMatrix, DynVector};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};

//! # padexp
//!
//! Matrix exponential of dense real or complex matrices by scaling and
//! squaring with diagonal Padé approximants, no-std compatible (requires a
//! global allocator).
//!
//! ## Quick start
//!
//! ```
//! use padexp::{expm, DynMatrix};
//!
//! // exp of a rotation generator is a rotation
//! let a = DynMatrix::from_rows(2, 2, &[0.0_f64, 1.0, -1.0, 0.0]);
//! let r = expm(&a).unwrap();
//! assert!((r[(0, 0)] - 1.0_f64.cos()).abs() < 1e-14);
//! assert!((r[(1, 0)] + 1.0_f64.sin()).abs() < 1e-14);
//! ```
//!
//! ## Modules
//!
//! - [`expm`] — The exponential itself ([`expm()`], [`expm_with_info`]) and
//!   the norm helpers it is built on: [`expm::onenorm`],
//!   [`expm::onenorm_matrix_power_nnm`] and the backward-error correction
//!   [`expm::ell`].
//!
//! - [`dynmatrix`] — Heap-allocated `DynMatrix<T>` with runtime dimensions.
//!   Column-major `Vec<T>` storage, arithmetic operators, one-norm.
//!
//! - [`linalg`] — LU with partial pivoting, used to solve the Padé system
//!   `Q X = P`. Free functions on `&mut impl MatrixMut<T>` plus the
//!   [`linalg::DynLu`] wrapper.
//!
//! - [`traits`] — Element trait hierarchy:
//!   - [`Scalar`] — all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`] — real floats (`Scalar + Float`), used for norms
//!   - [`LinalgScalar`] — real floats and complex numbers, accepted by [`expm()`]
//!   - [`MatrixRef`] / [`MatrixMut`] — column access for the LU kernels
//!
//! ## Logging
//!
//! Degree selection is reported through the [`log`](https://docs.rs/log)
//! facade: `trace` for the intermediate `eta` bounds, `debug` for the chosen
//! Padé degree and squaring count. Nothing is printed unless the application
//! installs a logger.
//!
//! ## Cargo features
//!
//! | Feature   | Default | Description |
//! |-----------|---------|-------------|
//! | `std`     | yes     | `std::error::Error` impls, hardware FPU via system libm |
//! | `complex` | no      | `Complex<f32>` / `Complex<f64>` support via `num-complex` |
//! | `all`     | no      | All features: `std` + `complex` |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dynmatrix;
pub mod expm;
pub mod linalg;
pub mod traits;

pub use dynmatrix::DynMatrix;
pub use expm::{expm, expm_with_info, ExpmError, ExpmInfo, PadeDegree};
pub use linalg::LinalgError;
pub use traits::{FloatScalar, LinalgScalar, MatrixMut, MatrixRef, Scalar};

#[cfg(feature = "complex")]
pub use num_complex::Complex;

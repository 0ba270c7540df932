/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Reference implementations of two Level-2/Level-3 BLAS kernels:
//!
//! * [`hbmv`]: `y := alpha * A * x + beta * y` for a complex Hermitian band matrix `A`
//!   held in packed band storage with split real and imaginary components.
//! * [`trmm`]: `B := alpha * op(A) * B` or `B := alpha * B * op(A)` for a real triangular
//!   matrix `A`.
//!
//! Both follow the classic column-major conventions: matrices are addressed through a
//! leading dimension, vectors through a signed increment, and option arguments are
//! passed as single character codes. Invalid arguments are reported through
//! [`BlasError`] instead of aborting the process.
//!
//! The precision-specific entry points [`chbmv`], [`zhbmv`], [`strmm`] and [`dtrmm`] are
//! thin wrappers over the generic kernels.

pub mod common;
pub use common::{Diag, Side, Transpose, Uplo};

mod complex;
pub use complex::SplitComplex;

mod error;
pub use error::BlasError;

mod scalar;
pub use scalar::Real;

mod hbmv;
pub use hbmv::hbmv;

mod trmm;
pub use trmm::trmm;

mod util;

pub use num_complex::{Complex, Complex32, Complex64};

// Make the reference implementation available for internal testing.
#[cfg(test)]
mod reference;

/// Single-precision complex Hermitian band matrix-vector product.
///
/// See [`hbmv`] for the meaning of every argument.
#[allow(clippy::too_many_arguments)]
pub fn chbmv(
    uplo: char,
    n: i32,
    k: i32,
    alpha: Complex32,
    a: SplitComplex<&[f32]>,
    lda: i32,
    x: SplitComplex<&[f32]>,
    incx: i32,
    beta: Complex32,
    y: SplitComplex<&mut [f32]>,
    incy: i32,
) -> Result<(), BlasError> {
    hbmv(uplo, n, k, alpha, a, lda, x, incx, beta, y, incy)
}

/// Double-precision complex Hermitian band matrix-vector product.
///
/// See [`hbmv`] for the meaning of every argument.
#[allow(clippy::too_many_arguments)]
pub fn zhbmv(
    uplo: char,
    n: i32,
    k: i32,
    alpha: Complex64,
    a: SplitComplex<&[f64]>,
    lda: i32,
    x: SplitComplex<&[f64]>,
    incx: i32,
    beta: Complex64,
    y: SplitComplex<&mut [f64]>,
    incy: i32,
) -> Result<(), BlasError> {
    hbmv(uplo, n, k, alpha, a, lda, x, incx, beta, y, incy)
}

/// Single-precision triangular matrix-matrix product.
///
/// See [`trmm`] for the meaning of every argument.
///
/// # Example
///
/// ```
/// // A = [3 5; 0 7] (upper triangular), B = [1; 1].
/// let a = [3.0f32, 0.0, 5.0, 7.0];
/// let mut b = [1.0f32, 1.0];
/// refblas_linalg::strmm('L', 'U', 'N', 'N', 2, 1, 2.0, &a, 2, &mut b, 2).unwrap();
/// assert_eq!(b, [16.0, 14.0]);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn strmm(
    side: char,
    uplo: char,
    transa: char,
    diag: char,
    m: i32,
    n: i32,
    alpha: f32,
    a: &[f32],
    lda: i32,
    b: &mut [f32],
    ldb: i32,
) -> Result<(), BlasError> {
    trmm(side, uplo, transa, diag, m, n, alpha, a, lda, b, ldb)
}

/// Double-precision triangular matrix-matrix product.
///
/// See [`trmm`] for the meaning of every argument.
#[allow(clippy::too_many_arguments)]
pub fn dtrmm(
    side: char,
    uplo: char,
    transa: char,
    diag: char,
    m: i32,
    n: i32,
    alpha: f64,
    a: &[f64],
    lda: i32,
    b: &mut [f64],
    ldb: i32,
) -> Result<(), BlasError> {
    trmm(side, uplo, transa, diag, m, n, alpha, a, lda, b, ldb)
}

/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Hermitian band matrix-vector product: `y := alpha * A * x + beta * y`.

use num_complex::Complex;
use num_traits::{One, Zero};
use refblas_utils::{
    strided::{MutStridedView, StridedView},
    views::BandView,
};

use crate::{
    common::Uplo,
    complex::{Parts, SplitComplex},
    scalar::Real,
    util::{dimension, expect_view},
    BlasError,
};

/// Compute `y := alpha * A * x + beta * y` where `A` is an `n x n` Hermitian band matrix
/// with `k` super-diagonals (`uplo = 'U'`) or sub-diagonals (`uplo = 'L'`).
///
/// * `uplo`: `'U'` if the upper triangle of the band is stored, `'L'` for the lower.
/// * `n`: The order of `A` and the length of `x` and `y`.
/// * `k`: The number of stored off-diagonals.
/// * `a`: The band packed by diagonals in a `(k + 1) x n` column-major block with leading
///   dimension `lda`. For `'U'` the main diagonal is in row `k` and `A[i, j]` is in row
///   `k + i - j`; for `'L'` the main diagonal is in row `0` and `A[i, j]` is in row `i - j`.
///   The imaginary parts of the diagonal are never read.
/// * `x`, `incx`: The input vector and its stride (negative strides walk backwards).
/// * `y`, `incy`: The output vector and its stride.
///
/// Arguments are validated in signature order and the first failure is reported as
/// [`BlasError::InvalidArgument`] with the 1-based parameter position:
///
/// | check            | position |
/// |------------------|----------|
/// | `uplo`           | 1        |
/// | `n < 0`          | 2        |
/// | `k < 0`          | 3        |
/// | `lda < k + 1`    | 6        |
/// | `incx == 0`      | 8        |
/// | `incy == 0`      | 11       |
///
/// Missing imaginary components of `a`, `x` or `y` are then reported as
/// [`BlasError::MissingImaginaryComponent`]. `y` is untouched when an error is returned.
///
/// # Panics
///
/// Panics if a component slice is shorter than its shape requires:
/// `(n - 1) * lda + k + 1` for `a` and `(n - 1) * |inc| + 1` for `x` and `y`.
#[allow(clippy::too_many_arguments)]
pub fn hbmv<T: Real>(
    uplo: char,
    n: i32,
    k: i32,
    alpha: Complex<T>,
    a: SplitComplex<&[T]>,
    lda: i32,
    x: SplitComplex<&[T]>,
    incx: i32,
    beta: Complex<T>,
    y: SplitComplex<&mut [T]>,
    incy: i32,
) -> Result<(), BlasError> {
    let routine = T::HBMV;
    let invalid = |position| BlasError::invalid_argument(routine, position);

    let uplo = Uplo::from_code(uplo).ok_or_else(|| invalid(1))?;
    let n = dimension(n).ok_or_else(|| invalid(2))?;
    let k_checked = dimension(k).ok_or_else(|| invalid(3))?;
    if i64::from(lda) < i64::from(k) + 1 {
        return Err(invalid(6));
    }
    if incx == 0 {
        return Err(invalid(8));
    }
    if incy == 0 {
        return Err(invalid(11));
    }
    let k = k_checked;

    let (a_re, a_im) = a.require("a")?;
    let (x_re, x_im) = x.require("x")?;
    let (y_re, y_im) = y.require("y")?;

    // Quick return if possible.
    let zero = Complex::<T>::zero();
    let one = Complex::<T>::one();
    if n == 0 || (alpha == zero && beta == one) {
        return Ok(());
    }

    let lda = lda as usize;
    let shape = uplo.into();
    let a = Parts {
        re: expect_view(BandView::try_shrink_from(a_re, shape, n, k, lda), routine, "a"),
        im: expect_view(BandView::try_shrink_from(a_im, shape, n, k, lda), routine, "a"),
    };
    let x = Parts {
        re: expect_view(StridedView::try_shrink_from(x_re, n, incx as isize), routine, "x"),
        im: expect_view(StridedView::try_shrink_from(x_im, n, incx as isize), routine, "x"),
    };
    let mut y = Parts {
        re: expect_view(MutStridedView::try_shrink_from_mut(y_re, n, incy as isize), routine, "y"),
        im: expect_view(MutStridedView::try_shrink_from_mut(y_im, n, incy as isize), routine, "y"),
    };

    scale(beta, &mut y);
    if alpha == zero {
        return Ok(());
    }

    tracing::trace!(routine, ?uplo, n, k, incx, incy, "accumulating band product");
    match uplo {
        Uplo::Upper => accumulate_upper(alpha, &a, &x, &mut y),
        Uplo::Lower => accumulate_lower(alpha, &a, &x, &mut y),
    }
    Ok(())
}

/// First form `y := beta * y`.
fn scale<T: Real>(beta: Complex<T>, y: &mut Parts<MutStridedView<'_, T>>) {
    let zero = Complex::<T>::zero();
    if beta == Complex::one() {
        return;
    }

    if beta == zero && y.re.is_contiguous() {
        y.re.as_mut_slice().fill(T::zero());
        y.im.as_mut_slice().fill(T::zero());
        return;
    }

    let mut iy = y.re.cursor();
    for _ in 0..y.re.len() {
        let scaled = if beta == zero {
            zero
        } else {
            beta * y.load(iy)
        };
        y.store(iy, scaled);
        iy.advance();
    }
}

/// Accumulate `alpha * A * x` into `y` when the upper triangle of the band is stored.
///
/// Each stored element `A[i, j]` above the diagonal contributes `A[i, j] * x[j]` to
/// `y[i]` and, through the Hermitian mirror, `conj(A[i, j]) * x[i]` to `y[j]`.
fn accumulate_upper<T: Real>(
    alpha: Complex<T>,
    a: &Parts<BandView<'_, T>>,
    x: &Parts<StridedView<'_, T>>,
    y: &mut Parts<MutStridedView<'_, T>>,
) {
    let mut jx = x.re.cursor();
    let mut jy = y.re.cursor();
    for j in 0..a.re.order() {
        let temp1 = alpha * x.load(jx);
        let mut temp2 = Complex::<T>::zero();

        let rows = a.re.off_diagonal_rows(j);
        let mut ix = x.re.cursor_at(rows.start);
        let mut iy = y.re.cursor_at(rows.start);
        for i in rows {
            let aij = a.load((i, j));
            let updated = y.load(iy) + temp1 * aij;
            y.store(iy, updated);
            temp2 += aij.conj() * x.load(ix);
            ix.advance();
            iy.advance();
        }

        let diagonal = *a.re.diagonal(j);
        let updated = y.load(jy) + temp1.scale(diagonal) + alpha * temp2;
        y.store(jy, updated);

        jx.advance();
        jy.advance();
    }
}

/// Accumulate `alpha * A * x` into `y` when the lower triangle of the band is stored.
///
/// The diagonal term is applied before the sub-diagonal sweep.
fn accumulate_lower<T: Real>(
    alpha: Complex<T>,
    a: &Parts<BandView<'_, T>>,
    x: &Parts<StridedView<'_, T>>,
    y: &mut Parts<MutStridedView<'_, T>>,
) {
    let mut jx = x.re.cursor();
    let mut jy = y.re.cursor();
    for j in 0..a.re.order() {
        let temp1 = alpha * x.load(jx);
        let mut temp2 = Complex::<T>::zero();

        let diagonal = *a.re.diagonal(j);
        let updated = y.load(jy) + temp1.scale(diagonal);
        y.store(jy, updated);

        let mut ix = jx;
        let mut iy = jy;
        for i in a.re.off_diagonal_rows(j) {
            ix.advance();
            iy.advance();
            let aij = a.load((i, j));
            let updated = y.load(iy) + temp1 * aij;
            y.store(iy, updated);
            temp2 += aij.conj() * x.load(ix);
        }

        let updated = y.load(jy) + alpha * temp2;
        y.store(jy, updated);

        jx.advance();
        jy.advance();
    }
}

///////////
// Tests //
///////////

/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Triangular matrix-matrix product: `B := alpha * op(A) * B` or `B := alpha * B * op(A)`.

use refblas_utils::views::{ColumnMajorView, MutColumnMajorView};

use crate::{
    common::{Diag, Side, Transpose, Uplo},
    scalar::Real,
    util::{dimension, expect_view},
    BlasError,
};

/// Compute `B := alpha * op(A) * B` (`side = 'L'`) or `B := alpha * B * op(A)`
/// (`side = 'R'`) in place.
///
/// * `side`: `'L'` or `'R'`.
/// * `uplo`: `'U'` if `A` is upper triangular, `'L'` if lower triangular. Only that
///   triangle of `A` is read.
/// * `transa`: `'N'` for `op(A) = A`, `'T'` or `'C'` for `op(A) = A'`.
/// * `diag`: `'U'` if `A` has an implicit unit diagonal (never read), `'N'` otherwise.
/// * `m`, `n`: The dimensions of `B`. `A` is `m x m` for the left side and `n x n` for the
///   right side.
/// * `a`, `lda`: `A` in column-major order with leading dimension `lda`.
/// * `b`, `ldb`: `B` in column-major order with leading dimension `ldb`.
///
/// Arguments are validated in signature order and the first failure is reported as
/// [`BlasError::InvalidArgument`] with the 1-based parameter position:
///
/// | check                    | position |
/// |--------------------------|----------|
/// | `side`                   | 1        |
/// | `uplo`                   | 2        |
/// | `transa`                 | 3        |
/// | `diag`                   | 4        |
/// | `m < 0`                  | 5        |
/// | `n < 0`                  | 6        |
/// | `lda < max(1, nrows(A))` | 9        |
/// | `ldb < max(1, m)`        | 11       |
///
/// `B` is untouched when an error is returned.
///
/// # Panics
///
/// Panics if `a` or `b` is shorter than its shape requires (`(k - 1) * lda + k` for the
/// `k x k` matrix `A`, `(n - 1) * ldb + m` for `B`).
#[allow(clippy::too_many_arguments)]
pub fn trmm<T: Real>(
    side: char,
    uplo: char,
    transa: char,
    diag: char,
    m: i32,
    n: i32,
    alpha: T,
    a: &[T],
    lda: i32,
    b: &mut [T],
    ldb: i32,
) -> Result<(), BlasError> {
    let routine = T::TRMM;
    let invalid = |position| BlasError::invalid_argument(routine, position);

    let side = Side::from_code(side).ok_or_else(|| invalid(1))?;
    let uplo = Uplo::from_code(uplo).ok_or_else(|| invalid(2))?;
    let transa = Transpose::from_code(transa).ok_or_else(|| invalid(3))?;
    let diag = Diag::from_code(diag).ok_or_else(|| invalid(4))?;
    let m = dimension(m).ok_or_else(|| invalid(5))?;
    let n = dimension(n).ok_or_else(|| invalid(6))?;
    let nrowa = match side {
        Side::Left => m,
        Side::Right => n,
    };
    let lda = dimension(lda)
        .filter(|&lda| lda >= nrowa.max(1))
        .ok_or_else(|| invalid(9))?;
    let ldb = dimension(ldb)
        .filter(|&ldb| ldb >= m.max(1))
        .ok_or_else(|| invalid(11))?;

    // Quick return if possible.
    if m == 0 || n == 0 {
        return Ok(());
    }

    let a = expect_view(
        ColumnMajorView::try_shrink_from(a, nrowa, nrowa, lda),
        routine,
        "a",
    );
    let mut b = expect_view(
        MutColumnMajorView::try_shrink_from_mut(b, m, n, ldb),
        routine,
        "b",
    );

    if alpha == T::zero() {
        for j in 0..n {
            b.column_mut(j).fill(T::zero());
        }
        return Ok(());
    }

    let branch = Branch::select(side, uplo, transa);
    tracing::trace!(routine, ?branch, ?diag, m, n, "applying triangular product");
    branch.apply(alpha, diag, &a, &mut b);
    Ok(())
}

/// The eight update orders of the triangular product, one per combination of
/// `(side, op(A), uplo)`.
///
/// Each order walks `B` so that every element is consumed before it is overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Branch {
    /// `B := alpha * A * B`, `A` upper.
    LeftUpperNoTrans,
    /// `B := alpha * A * B`, `A` lower.
    LeftLowerNoTrans,
    /// `B := alpha * A' * B`, `A` upper.
    LeftUpperTrans,
    /// `B := alpha * A' * B`, `A` lower.
    LeftLowerTrans,
    /// `B := alpha * B * A`, `A` upper.
    RightUpperNoTrans,
    /// `B := alpha * B * A`, `A` lower.
    RightLowerNoTrans,
    /// `B := alpha * B * A'`, `A` upper.
    RightUpperTrans,
    /// `B := alpha * B * A'`, `A` lower.
    RightLowerTrans,
}

impl Branch {
    pub(crate) fn select(side: Side, uplo: Uplo, transa: Transpose) -> Self {
        match (side, transa.is_transpose(), uplo) {
            (Side::Left, false, Uplo::Upper) => Self::LeftUpperNoTrans,
            (Side::Left, false, Uplo::Lower) => Self::LeftLowerNoTrans,
            (Side::Left, true, Uplo::Upper) => Self::LeftUpperTrans,
            (Side::Left, true, Uplo::Lower) => Self::LeftLowerTrans,
            (Side::Right, false, Uplo::Upper) => Self::RightUpperNoTrans,
            (Side::Right, false, Uplo::Lower) => Self::RightLowerNoTrans,
            (Side::Right, true, Uplo::Upper) => Self::RightUpperTrans,
            (Side::Right, true, Uplo::Lower) => Self::RightLowerTrans,
        }
    }

    fn apply<T: Real>(
        self,
        alpha: T,
        diag: Diag,
        a: &ColumnMajorView<'_, T>,
        b: &mut MutColumnMajorView<'_, T>,
    ) {
        match self {
            Self::LeftUpperNoTrans => left_upper_notrans(alpha, diag, a, b),
            Self::LeftLowerNoTrans => left_lower_notrans(alpha, diag, a, b),
            Self::LeftUpperTrans => left_upper_trans(alpha, diag, a, b),
            Self::LeftLowerTrans => left_lower_trans(alpha, diag, a, b),
            Self::RightUpperNoTrans => right_upper_notrans(alpha, diag, a, b),
            Self::RightLowerNoTrans => right_lower_notrans(alpha, diag, a, b),
            Self::RightUpperTrans => right_upper_trans(alpha, diag, a, b),
            Self::RightLowerTrans => right_lower_trans(alpha, diag, a, b),
        }
    }
}

//////////
// Left //
//////////

// Column `j` of `B` is rebuilt top to bottom. Row `k` is only overwritten once its old
// value has been scattered into the rows above it.
fn left_upper_notrans<T: Real>(
    alpha: T,
    diag: Diag,
    a: &ColumnMajorView<'_, T>,
    b: &mut MutColumnMajorView<'_, T>,
) {
    let (m, n) = (b.nrows(), b.ncols());
    for j in 0..n {
        for k in 0..m {
            let bkj = b[(k, j)];
            if bkj != T::zero() {
                let mut temp = alpha * bkj;
                for i in 0..k {
                    b[(i, j)] += temp * a[(i, k)];
                }
                if diag.is_non_unit() {
                    temp *= a[(k, k)];
                }
                b[(k, j)] = temp;
            }
        }
    }
}

fn left_lower_notrans<T: Real>(
    alpha: T,
    diag: Diag,
    a: &ColumnMajorView<'_, T>,
    b: &mut MutColumnMajorView<'_, T>,
) {
    let (m, n) = (b.nrows(), b.ncols());
    for j in 0..n {
        for k in (0..m).rev() {
            let bkj = b[(k, j)];
            if bkj != T::zero() {
                let temp = alpha * bkj;
                b[(k, j)] = temp;
                if diag.is_non_unit() {
                    b[(k, j)] *= a[(k, k)];
                }
                for i in (k + 1)..m {
                    b[(i, j)] += temp * a[(i, k)];
                }
            }
        }
    }
}

// Row `i` of `A' * B` only needs rows `0..=i` of the old column, so walking `i`
// downwards leaves those rows intact until they have been read.
fn left_upper_trans<T: Real>(
    alpha: T,
    diag: Diag,
    a: &ColumnMajorView<'_, T>,
    b: &mut MutColumnMajorView<'_, T>,
) {
    let (m, n) = (b.nrows(), b.ncols());
    for j in 0..n {
        for i in (0..m).rev() {
            let mut temp = b[(i, j)];
            if diag.is_non_unit() {
                temp *= a[(i, i)];
            }
            for k in 0..i {
                temp += a[(k, i)] * b[(k, j)];
            }
            b[(i, j)] = alpha * temp;
        }
    }
}

fn left_lower_trans<T: Real>(
    alpha: T,
    diag: Diag,
    a: &ColumnMajorView<'_, T>,
    b: &mut MutColumnMajorView<'_, T>,
) {
    let (m, n) = (b.nrows(), b.ncols());
    for j in 0..n {
        for i in 0..m {
            let mut temp = b[(i, j)];
            if diag.is_non_unit() {
                temp *= a[(i, i)];
            }
            for k in (i + 1)..m {
                temp += a[(k, i)] * b[(k, j)];
            }
            b[(i, j)] = alpha * temp;
        }
    }
}

///////////
// Right //
///////////

/// `B[:, dst] += scale * B[:, src]`.
#[inline]
fn axpy_column<T: Real>(b: &mut MutColumnMajorView<'_, T>, scale: T, src: usize, dst: usize) {
    for i in 0..b.nrows() {
        let bik = b[(i, src)];
        b[(i, dst)] += scale * bik;
    }
}

/// `B[:, j] *= scale`.
#[inline]
fn scale_column<T: Real>(b: &mut MutColumnMajorView<'_, T>, scale: T, j: usize) {
    for bij in b.column_mut(j) {
        *bij *= scale;
    }
}

/// Multiply `alpha` by the diagonal element `A[j, j]` unless the diagonal is implicit.
#[inline]
fn diagonal_scale<T: Real>(alpha: T, diag: Diag, a: &ColumnMajorView<'_, T>, j: usize) -> T {
    if diag.is_non_unit() {
        alpha * a[(j, j)]
    } else {
        alpha
    }
}

// New column `j` mixes old columns `0..=j`, so columns are produced right to left.
fn right_upper_notrans<T: Real>(
    alpha: T,
    diag: Diag,
    a: &ColumnMajorView<'_, T>,
    b: &mut MutColumnMajorView<'_, T>,
) {
    let n = b.ncols();
    for j in (0..n).rev() {
        scale_column(b, diagonal_scale(alpha, diag, a, j), j);
        for k in 0..j {
            let akj = a[(k, j)];
            if akj != T::zero() {
                axpy_column(b, alpha * akj, k, j);
            }
        }
    }
}

fn right_lower_notrans<T: Real>(
    alpha: T,
    diag: Diag,
    a: &ColumnMajorView<'_, T>,
    b: &mut MutColumnMajorView<'_, T>,
) {
    let n = b.ncols();
    for j in 0..n {
        scale_column(b, diagonal_scale(alpha, diag, a, j), j);
        for k in (j + 1)..n {
            let akj = a[(k, j)];
            if akj != T::zero() {
                axpy_column(b, alpha * akj, k, j);
            }
        }
    }
}

// Old column `k` is scattered into the columns to its left before it is scaled in place.
fn right_upper_trans<T: Real>(
    alpha: T,
    diag: Diag,
    a: &ColumnMajorView<'_, T>,
    b: &mut MutColumnMajorView<'_, T>,
) {
    let n = b.ncols();
    for k in 0..n {
        for j in 0..k {
            let ajk = a[(j, k)];
            if ajk != T::zero() {
                axpy_column(b, alpha * ajk, k, j);
            }
        }
        let temp = diagonal_scale(alpha, diag, a, k);
        if temp != T::one() {
            scale_column(b, temp, k);
        }
    }
}

fn right_lower_trans<T: Real>(
    alpha: T,
    diag: Diag,
    a: &ColumnMajorView<'_, T>,
    b: &mut MutColumnMajorView<'_, T>,
) {
    let n = b.ncols();
    for k in (0..n).rev() {
        for j in (k + 1)..n {
            let ajk = a[(j, k)];
            if ajk != T::zero() {
                axpy_column(b, alpha * ajk, k, j);
            }
        }
        let temp = diagonal_scale(alpha, diag, a, k);
        if temp != T::one() {
            scale_column(b, temp, k);
        }
    }
}

///////////
// Tests //
///////////

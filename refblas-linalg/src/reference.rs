/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Dense, obviously-correct versions of the kernels and random problem generators used
//! to check them.

use num_complex::Complex;
use rand::Rng;
use refblas_utils::views::ColumnMajor;
use thiserror::Error;

use crate::Real;

fn cast<T: Real>(value: f64) -> T {
    T::from(value).unwrap()
}

/// Physical positions of the `n` logical elements of a strided vector, in logical order.
pub(crate) fn positions(n: usize, inc: isize) -> impl Iterator<Item = usize> {
    let step = inc.unsigned_abs();
    let last = n.saturating_sub(1) * step;
    (0..n).map(move |i| if inc > 0 { i * step } else { last - i * step })
}

/// Positions of a buffer of length `len` that are not addressed by the strided vector.
pub(crate) fn untouched_positions(n: usize, inc: isize, len: usize) -> Vec<usize> {
    let mut touched = vec![false; len];
    for p in positions(n, inc) {
        touched[p] = true;
    }
    (0..len).filter(|&p| !touched[p]).collect()
}

/// Collect the logical elements of a split-complex strided vector.
pub(crate) fn gather<T: Real>(re: &[T], im: &[T], n: usize, inc: isize) -> Vec<Complex<T>> {
    positions(n, inc).map(|p| Complex::new(re[p], im[p])).collect()
}

fn strided_length(n: usize, inc: isize) -> usize {
    if n == 0 {
        0
    } else {
        (n - 1) * inc.unsigned_abs() + 1
    }
}

//////////
// HBMV //
//////////

/// A randomly generated Hermitian band problem in packed split-complex storage.
///
/// Band cells the kernel may read hold finite values. Cells it must never read (the
/// unused corner of the packed array, padding rows below the band and the imaginary part
/// of the diagonal) hold NaN so that any stray read shows up in the output.
#[derive(Debug, Clone)]
pub(crate) struct BandProblem<T> {
    pub(crate) uplo: char,
    pub(crate) n: usize,
    pub(crate) k: usize,
    pub(crate) lda: usize,
    pub(crate) incx: isize,
    pub(crate) incy: isize,
    pub(crate) a_re: Vec<T>,
    pub(crate) a_im: Vec<T>,
    pub(crate) x_re: Vec<T>,
    pub(crate) x_im: Vec<T>,
    pub(crate) y_re: Vec<T>,
    pub(crate) y_im: Vec<T>,
}

impl<T: Real> BandProblem<T> {
    pub(crate) fn random<R: Rng>(
        rng: &mut R,
        uplo: char,
        n: usize,
        k: usize,
        lda: usize,
        (incx, incy): (isize, isize),
    ) -> Self {
        assert!(lda > k, "leading dimension must cover the band");
        let upper = uplo.eq_ignore_ascii_case(&'U');

        let mut next = || cast::<T>(rng.random_range(-1.0..1.0));

        let mut a_re = vec![T::nan(); lda * n];
        let mut a_im = vec![T::nan(); lda * n];
        for j in 0..n {
            let rows = if upper {
                j.saturating_sub(k)..(j + 1)
            } else {
                j..n.min(j + k + 1)
            };
            for i in rows {
                let p = j * lda + if upper { k + i - j } else { i - j };
                a_re[p] = next();
                if i != j {
                    a_im[p] = next();
                }
            }
        }

        let lx = strided_length(n, incx);
        let ly = strided_length(n, incy);
        let x_re = (0..lx).map(|_| next()).collect();
        let x_im = (0..lx).map(|_| next()).collect();
        let y_re = (0..ly).map(|_| next()).collect();
        let y_im = (0..ly).map(|_| next()).collect();

        Self {
            uplo,
            n,
            k,
            lda,
            incx,
            incy,
            a_re,
            a_im,
            x_re,
            x_im,
            y_re,
            y_im,
        }
    }

    /// Expand the packed band into a dense Hermitian `n x n` matrix in row-major order.
    pub(crate) fn dense(&self) -> Vec<Complex<T>> {
        let (n, k, lda) = (self.n, self.k, self.lda);
        let upper = self.uplo.eq_ignore_ascii_case(&'U');
        let mut dense = vec![Complex::new(T::zero(), T::zero()); n * n];
        for j in 0..n {
            for i in 0..n {
                // Element (r, c) of the stored triangle, with r <= c for upper storage.
                let (r, c, conjugate) = match (upper, i <= j) {
                    (true, true) | (false, false) => (i, j, false),
                    (true, false) | (false, true) => (j, i, true),
                };
                if r.abs_diff(c) > k {
                    continue;
                }
                let p = c * lda + if upper { k + r - c } else { r - c };
                let value = if r == c {
                    Complex::new(self.a_re[p], T::zero())
                } else {
                    Complex::new(self.a_re[p], self.a_im[p])
                };
                dense[i * n + j] = if conjugate { value.conj() } else { value };
            }
        }
        dense
    }
}

/// Compute `alpha * A * x + beta * y` with a dense Hermitian `A`, returning the logical
/// elements of the result.
///
/// A zero `beta` discards `y` entirely.
pub(crate) fn hbmv<T: Real>(
    problem: &BandProblem<T>,
    alpha: Complex<T>,
    beta: Complex<T>,
) -> Vec<Complex<T>> {
    let n = problem.n;
    let dense = problem.dense();
    let x = gather(&problem.x_re, &problem.x_im, n, problem.incx);
    let y = gather(&problem.y_re, &problem.y_im, n, problem.incy);
    let zero = Complex::new(T::zero(), T::zero());

    (0..n)
        .map(|i| {
            let ax = (0..n).fold(zero, |acc, j| acc + dense[i * n + j] * x[j]);
            let scaled = if beta == zero { zero } else { beta * y[i] };
            scaled + alpha * ax
        })
        .collect()
}

//////////
// TRMM //
//////////

/// A randomly generated triangular product problem with small integer entries.
///
/// Small integers keep every intermediate sum exact, so any correct evaluation order
/// produces bit-identical results.
#[derive(Debug, Clone)]
pub(crate) struct TriangularProblem<T> {
    pub(crate) side: char,
    pub(crate) uplo: char,
    pub(crate) transa: char,
    pub(crate) diag: char,
    pub(crate) m: usize,
    pub(crate) n: usize,
    pub(crate) alpha: T,
    pub(crate) a: Vec<T>,
    pub(crate) lda: usize,
    pub(crate) b: Vec<T>,
    pub(crate) ldb: usize,
}

impl<T: Real> TriangularProblem<T> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn random<R: Rng>(
        rng: &mut R,
        side: char,
        uplo: char,
        transa: char,
        diag: char,
        m: usize,
        n: usize,
        alpha: T,
    ) -> Self {
        let nrowa = if side.eq_ignore_ascii_case(&'L') { m } else { n };
        let lda = nrowa.max(1) + rng.random_range(0..2usize);
        let ldb = m.max(1) + rng.random_range(0..3usize);

        let mut next = || cast::<T>(f64::from(rng.random_range(-3i32..=3)));
        let a = (0..lda * nrowa).map(|_| next()).collect();
        let b = (0..(n.saturating_sub(1) * ldb + m)).map(|_| next()).collect();

        Self {
            side,
            uplo,
            transa,
            diag,
            m,
            n,
            alpha,
            a,
            lda,
            b,
            ldb,
        }
    }

    /// The order of the triangular matrix `A`.
    pub(crate) fn nrowa(&self) -> usize {
        if self.is_left() {
            self.m
        } else {
            self.n
        }
    }

    fn is_left(&self) -> bool {
        self.side.eq_ignore_ascii_case(&'L')
    }

    fn is_upper(&self) -> bool {
        self.uplo.eq_ignore_ascii_case(&'U')
    }

    fn is_unit(&self) -> bool {
        self.diag.eq_ignore_ascii_case(&'U')
    }

    fn is_transposed(&self) -> bool {
        !self.transa.eq_ignore_ascii_case(&'N')
    }

    /// Whether `A[i, j]` is part of the stored triangle.
    fn in_triangle(&self, i: usize, j: usize) -> bool {
        if self.is_upper() {
            i <= j
        } else {
            i >= j
        }
    }

    /// Overwrite the stored diagonal of `A`.
    pub(crate) fn set_diagonal(&mut self, value: T) {
        for j in 0..self.nrowa() {
            self.a[j * self.lda + j] = value;
        }
    }

    /// Overwrite every element of `a` the kernel must not read: the opposite triangle,
    /// the padding rows and, for a unit diagonal, the diagonal itself.
    pub(crate) fn poison_unreferenced(&mut self, value: T) {
        let nrowa = self.nrowa();
        for j in 0..nrowa {
            for i in 0..self.lda {
                let referenced = i < nrowa
                    && self.in_triangle(i, j)
                    && !(i == j && self.is_unit());
                if !referenced {
                    self.a[j * self.lda + i] = value;
                }
            }
        }
    }

    /// The effective triangular matrix `A` with explicit zeros and unit diagonal.
    pub(crate) fn dense_a(&self) -> ColumnMajor<T> {
        let k = self.nrowa();
        let mut dense = ColumnMajor::new(T::zero(), k, k);
        for j in 0..k {
            for i in 0..k {
                dense[(i, j)] = if i == j && self.is_unit() {
                    T::one()
                } else if self.in_triangle(i, j) {
                    self.a[j * self.lda + i]
                } else {
                    T::zero()
                };
            }
        }
        dense
    }
}

/// Compute the triangular product by dense multiplication, returning the full `b` buffer.
///
/// Padding rows of `b` are carried over unchanged.
pub(crate) fn trmm<T: Real>(problem: &TriangularProblem<T>) -> Vec<T> {
    let (m, n, ldb) = (problem.m, problem.n, problem.ldb);
    let a = problem.dense_a();
    let op = |i: usize, j: usize| {
        if problem.is_transposed() {
            a[(j, i)]
        } else {
            a[(i, j)]
        }
    };
    let b = |i: usize, j: usize| problem.b[j * ldb + i];

    let mut out = problem.b.clone();
    for j in 0..n {
        for i in 0..m {
            let sum = if problem.is_left() {
                (0..m).fold(T::zero(), |acc, l| acc + op(i, l) * b(l, j))
            } else {
                (0..n).fold(T::zero(), |acc, l| acc + b(i, l) * op(l, j))
            };
            out[j * ldb + i] = problem.alpha * sum;
        }
    }
    out
}

#[derive(Debug, Error)]
#[error("mismatch in test problem. got {:?}, expected {:?}", got, expected)]
pub(crate) struct ReferenceError<T: std::fmt::Debug> {
    got: Vec<T>,
    expected: Vec<T>,
}

impl<T: Real> TriangularProblem<T> {
    /// Run `f` on a copy of `b` and compare the result against `expected` exactly.
    pub(crate) fn check<F>(&self, expected: &[T], f: F) -> Result<(), ReferenceError<T>>
    where
        F: FnOnce(&Self, &mut [T]),
    {
        let mut result = self.b.clone();
        f(self, &mut result);
        if result == expected {
            Ok(())
        } else {
            Err(ReferenceError {
                got: result,
                expected: expected.to_vec(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn strided_positions() {
        assert_eq!(positions(3, 1).collect::<Vec<_>>(), [0, 1, 2]);
        assert_eq!(positions(3, 2).collect::<Vec<_>>(), [0, 2, 4]);
        assert_eq!(positions(3, -2).collect::<Vec<_>>(), [4, 2, 0]);
        assert_eq!(positions(0, -2).count(), 0);
        assert_eq!(untouched_positions(3, -2, 5), [1, 3]);
    }

    #[test]
    fn dense_band_is_hermitian() {
        let mut rng = StdRng::seed_from_u64(0x4e);
        for uplo in ['U', 'L'] {
            let problem = BandProblem::<f64>::random(&mut rng, uplo, 6, 2, 4, (1, 1));
            let dense = problem.dense();
            for i in 0..6 {
                for j in 0..6 {
                    assert_eq!(dense[i * 6 + j], dense[j * 6 + i].conj());
                    if i.abs_diff(j) > 2 {
                        assert_eq!(dense[i * 6 + j], Complex::new(0.0, 0.0));
                    } else {
                        assert!(dense[i * 6 + j].re.is_finite());
                        assert!(dense[i * 6 + j].im.is_finite());
                    }
                }
            }
        }
    }

    #[test]
    fn dense_trmm_reference() {
        // Upper A = [1 2; 0 3], B = [1 1; 2 0], A * B = [5 1; 6 0].
        let problem = TriangularProblem {
            side: 'L',
            uplo: 'U',
            transa: 'N',
            diag: 'N',
            m: 2,
            n: 2,
            alpha: 1.0f32,
            a: vec![1.0, 99.0, 2.0, 3.0],
            lda: 2,
            b: vec![1.0, 2.0, 1.0, 0.0],
            ldb: 2,
        };
        assert_eq!(trmm(&problem), [5.0, 6.0, 1.0, 0.0]);

        // B * A' with a unit diagonal: A' = [1 0; 2 1], B * A' = [3 1; 2 0].
        let problem = TriangularProblem {
            side: 'R',
            transa: 'T',
            diag: 'U',
            ..problem
        };
        assert_eq!(trmm(&problem), [3.0, 2.0, 1.0, 0.0]);
    }
}

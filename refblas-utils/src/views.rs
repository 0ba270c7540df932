/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Column-major storage accessors for dense, triangular and band matrices.
//!
//! All accessors share one addressing law: column `j` begins at linear offset
//! `col_offset(j) = j * ld` and element `(i, j)` of the stored block lives at
//! `col_offset(j) + i`. Band matrices are a thin layer on top that maps a logical
//! element `(i, j)` onto its packed row within column `j`.

use std::ops::{Index, IndexMut, Range};

use thiserror::Error;

/// Types that can hand out a dense slice of their elements.
///
/// This trait is implemented for immutable and mutable slice references (and boxed
/// slices), allowing the view types in this module to share code paths between their
/// immutable and mutable variants.
///
/// # Safety
///
/// This trait is unsafe because it requires `as_slice` to be idempotent (and unsafe code
/// relies on this).
///
/// In other words: `as_slice` must **always** return the same slice with the same length.
pub unsafe trait DenseData {
    type Elem;

    /// Return the underlying data as a slice.
    fn as_slice(&self) -> &[Self::Elem];
}

/// A mutable companion to `DenseData`.
///
/// # Safety
///
/// Same requirement as [`DenseData`]. Additionally, the returned slice must span the exact
/// same memory as `as_slice`.
pub unsafe trait MutDenseData: DenseData {
    fn as_mut_slice(&mut self) -> &mut [Self::Elem];
}

// SAFETY: A shared slice always returns itself.
unsafe impl<T> DenseData for &[T] {
    type Elem = T;
    fn as_slice(&self) -> &[Self::Elem] {
        self
    }
}

// SAFETY: A mutable slice always returns itself.
unsafe impl<T> DenseData for &mut [T] {
    type Elem = T;
    fn as_slice(&self) -> &[Self::Elem] {
        self
    }
}

// SAFETY: Returns the same memory as `as_slice`.
unsafe impl<T> MutDenseData for &mut [T] {
    fn as_mut_slice(&mut self) -> &mut [Self::Elem] {
        self
    }
}

// SAFETY: A boxed slice never changes its length.
unsafe impl<T> DenseData for Box<[T]> {
    type Elem = T;
    fn as_slice(&self) -> &[Self::Elem] {
        self
    }
}

// SAFETY: Returns the same memory as `as_slice`.
unsafe impl<T> MutDenseData for Box<[T]> {
    fn as_mut_slice(&mut self) -> &mut [Self::Elem] {
        self
    }
}

/// Return the minimum linear length of a buffer backing an `nrows x ncols` column-major
/// matrix with leading dimension `ld`.
///
/// The last column only needs `nrows` elements, so the result is
/// `(ncols - 1) * ld + nrows` for non-empty matrices and `0` otherwise.
pub fn linear_length(nrows: usize, ncols: usize, ld: usize) -> usize {
    if nrows == 0 {
        return 0;
    }
    (ncols.max(1) - 1) * ld + ncols.min(1) * nrows
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
#[error(
    "tried to construct a column-major matrix with {nrows} rows and {ncols} cols and \
     leading dimension {ld} over a slice of length {len} (expected at least {})",
     linear_length(self.nrows, self.ncols, self.ld)
)]
pub struct TryFromError {
    len: usize,
    nrows: usize,
    ncols: usize,
    ld: usize,
}

impl TryFromError {
    /// Return the length of the rejected slice.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return whether the rejected slice was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A generator for initializing the entries in a matrix via `ColumnMajor::new`.
pub trait Generator<T> {
    fn generate(&mut self) -> T;
}

impl<T> Generator<T> for T
where
    T: Clone,
{
    fn generate(&mut self) -> T {
        self.clone()
    }
}

/// A matrix initializer that invokes the provided lambda to initialize each element.
pub struct Init<F>(pub F);

impl<T, F> Generator<T> for Init<F>
where
    F: FnMut() -> T,
{
    fn generate(&mut self) -> T {
        (self.0)()
    }
}

//////////////////
// Column Major //
//////////////////

/// A view over a chunk of memory interpreting it as a column-major matrix whose columns
/// are separated by a leading dimension `ld`.
///
/// ```text
///             col 0  col 1  col 2
///            +------+------+------+  ^
///            | a0   | b0   | c0   |  |
///            | a1   | b1   | c1   | nrows
///            | a2   | b2   | c2   |  |
///            +------+------+------+  v
///              a3     b3             ^
///              a4     b4            ld - nrows (padding, never read)
/// ```
///
/// Only the elements explicitly requested through the accessors are ever read. Kernels
/// that use a single triangle of the matrix therefore never touch the other one, and that
/// memory may hold anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnMajorBase<T>
where
    T: DenseData,
{
    data: T,
    nrows: usize,
    ncols: usize,
    // Distance between the first elements of consecutive columns. Never less than `nrows`.
    ld: usize,
}

impl<T> ColumnMajorBase<Box<[T]>> {
    /// Construct a new dense (`ld == nrows`) matrix initialized with the contents of the
    /// generator.
    ///
    /// Elements are initialized in memory order, that is, column by column.
    pub fn new<U>(mut generator: U, nrows: usize, ncols: usize) -> Self
    where
        U: Generator<T>,
    {
        let data: Box<[T]> = (0..nrows * ncols).map(|_| generator.generate()).collect();
        debug_assert_eq!(data.len(), nrows * ncols);
        Self {
            data,
            nrows,
            ncols,
            ld: nrows,
        }
    }
}

impl<'a, T> ColumnMajorBase<&'a [T]> {
    /// Construct a view over `data`, shrinking the slice to the minimum length required by
    /// `linear_length`.
    ///
    /// Returns an error if `data` is shorter than `linear_length(nrows, ncols, ld)`.
    ///
    /// # Panics
    ///
    /// * Panics if `ld < nrows`.
    pub fn try_shrink_from(
        data: &'a [T],
        nrows: usize,
        ncols: usize,
        ld: usize,
    ) -> Result<Self, TryFromError> {
        assert!(
            ld >= nrows,
            "leading dimension must be greater than or equal to nrows"
        );
        let required_length = linear_length(nrows, ncols, ld);
        match data.get(..required_length) {
            Some(data) => Ok(Self {
                data,
                nrows,
                ncols,
                ld,
            }),
            None => Err(TryFromError {
                len: data.len(),
                nrows,
                ncols,
                ld,
            }),
        }
    }
}

impl<'a, T> ColumnMajorBase<&'a mut [T]> {
    /// Construct a mutable view over `data`, shrinking the slice to the minimum length
    /// required by `linear_length`.
    ///
    /// Returns an error if `data` is shorter than `linear_length(nrows, ncols, ld)`.
    ///
    /// # Panics
    ///
    /// * Panics if `ld < nrows`.
    pub fn try_shrink_from_mut(
        data: &'a mut [T],
        nrows: usize,
        ncols: usize,
        ld: usize,
    ) -> Result<Self, TryFromError> {
        assert!(
            ld >= nrows,
            "leading dimension must be greater than or equal to nrows"
        );
        let required_length = linear_length(nrows, ncols, ld);
        let len = data.len();
        if len >= required_length {
            Ok(Self {
                data: &mut data[..required_length],
                nrows,
                ncols,
                ld,
            })
        } else {
            Err(TryFromError {
                len,
                nrows,
                ncols,
                ld,
            })
        }
    }
}

impl<T> ColumnMajorBase<T>
where
    T: DenseData,
{
    /// Return the number of rows in the matrix.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Return the number of columns in the matrix.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Return the leading dimension.
    pub fn ld(&self) -> usize {
        self.ld
    }

    /// Return the linear offset of the first stored element of column `col`.
    #[inline(always)]
    pub fn col_offset(&self, col: usize) -> usize {
        col * self.ld
    }

    /// Return the linear offset of element `(row, col)`.
    #[inline(always)]
    pub fn linear_index(&self, row: usize, col: usize) -> usize {
        self.col_offset(col) + row
    }

    /// Return the underlying data as a slice.
    ///
    /// # Note
    ///
    /// The slice includes the padding rows between columns.
    pub fn as_slice(&self) -> &[T::Elem] {
        self.data.as_slice()
    }

    /// Return the underlying data as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T::Elem]
    where
        T: MutDenseData,
    {
        self.data.as_mut_slice()
    }

    /// Return column `col` (without padding) as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `col >= self.ncols()`.
    pub fn column(&self, col: usize) -> &[T::Elem] {
        assert!(
            col < self.ncols(),
            "tried to access column {col} of a matrix with {} columns",
            self.ncols()
        );
        let start = self.col_offset(col);
        &self.as_slice()[start..start + self.nrows]
    }

    /// Return column `col` (without padding) as a mutable slice.
    ///
    /// # Panics
    ///
    /// Panics if `col >= self.ncols()`.
    pub fn column_mut(&mut self, col: usize) -> &mut [T::Elem]
    where
        T: MutDenseData,
    {
        assert!(
            col < self.ncols(),
            "tried to access column {col} of a matrix with {} columns",
            self.ncols()
        );
        let start = self.col_offset(col);
        let nrows = self.nrows;
        &mut self.as_mut_slice()[start..start + nrows]
    }

    /// Return a view over the matrix.
    pub fn as_view(&self) -> ColumnMajorView<'_, T::Elem> {
        ColumnMajorBase {
            data: self.as_slice(),
            nrows: self.nrows,
            ncols: self.ncols,
            ld: self.ld,
        }
    }

    /// Return a mutable view over the matrix.
    pub fn as_mut_view(&mut self) -> MutColumnMajorView<'_, T::Elem>
    where
        T: MutDenseData,
    {
        let (nrows, ncols, ld) = (self.nrows, self.ncols, self.ld);
        ColumnMajorBase {
            data: self.as_mut_slice(),
            nrows,
            ncols,
            ld,
        }
    }

    /// Returns a reference to an element without boundschecking.
    ///
    /// # Safety
    ///
    /// The following conditions must hold to avoid undefined behavior:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> &T::Elem {
        debug_assert!(row < self.nrows);
        debug_assert!(col < self.ncols);
        // SAFETY: The constructors guarantee the slice spans `linear_length` elements,
        // which covers every in-bounds `(row, col)`.
        unsafe { self.as_slice().get_unchecked(self.linear_index(row, col)) }
    }

    /// Returns a mutable reference to an element without boundschecking.
    ///
    /// # Safety
    ///
    /// The following conditions must hold to avoid undefined behavior:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    pub unsafe fn get_unchecked_mut(&mut self, row: usize, col: usize) -> &mut T::Elem
    where
        T: MutDenseData,
    {
        debug_assert!(row < self.nrows);
        debug_assert!(col < self.ncols);
        let index = self.linear_index(row, col);
        // SAFETY: See `get_unchecked`.
        unsafe { self.as_mut_slice().get_unchecked_mut(index) }
    }
}

/// An owning column-major matrix with `ld == nrows`.
pub type ColumnMajor<T> = ColumnMajorBase<Box<[T]>>;

/// A borrowed column-major matrix.
pub type ColumnMajorView<'a, T> = ColumnMajorBase<&'a [T]>;

/// A mutably borrowed column-major matrix.
pub type MutColumnMajorView<'a, T> = ColumnMajorBase<&'a mut [T]>;

/// Return a reference to the item at entry `(row, col)` in the matrix.
///
/// # Panics
///
/// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
impl<T> Index<(usize, usize)> for ColumnMajorBase<T>
where
    T: DenseData,
{
    type Output = T::Elem;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(
            row < self.nrows(),
            "row {row} is out of bounds (max: {})",
            self.nrows()
        );
        assert!(
            col < self.ncols(),
            "col {col} is out of bounds (max: {})",
            self.ncols()
        );

        // SAFETY: We have checked that `row` and `col` are in-bounds.
        unsafe { self.get_unchecked(row, col) }
    }
}

/// Return a mutable reference to the item at entry `(row, col)` in the matrix.
///
/// # Panics
///
/// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
impl<T> IndexMut<(usize, usize)> for ColumnMajorBase<T>
where
    T: MutDenseData,
{
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(
            row < self.nrows(),
            "row {row} is out of bounds (max: {})",
            self.nrows()
        );
        assert!(
            col < self.ncols(),
            "col {col} is out of bounds (max: {})",
            self.ncols()
        );

        // SAFETY: We have checked that `row` and `col` are in-bounds.
        unsafe { self.get_unchecked_mut(row, col) }
    }
}

//////////
// Band //
//////////

/// Which triangle of a band matrix is kept in packed storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandShape {
    /// The main diagonal and the `kd` super-diagonals.
    Upper,
    /// The main diagonal and the `kd` sub-diagonals.
    Lower,
}

/// A square `n x n` band matrix with `kd` off-diagonals packed by diagonals.
///
/// Column `j` of the packed block holds the band elements of column `j` of the logical
/// matrix. For `BandShape::Upper` the main diagonal sits in packed row `kd` and element
/// `(i, j)` lives in packed row `kd + i - j`:
///
/// ```text
///   logical (n = 4, kd = 1)      packed (kd + 1 rows)
///   a00 a01  .   .               *   a01 a12 a23
///    .  a11 a12  .               a00 a11 a22 a33
///    .   .  a22 a23
///    .   .   .  a33
/// ```
///
/// For `BandShape::Lower` the main diagonal sits in packed row `0` and element `(i, j)`
/// lives in packed row `i - j`. Packed cells marked `*` are never read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandBase<T>
where
    T: DenseData,
{
    storage: ColumnMajorBase<T>,
    kd: usize,
    shape: BandShape,
}

/// A borrowed band matrix.
pub type BandView<'a, T> = BandBase<&'a [T]>;

impl<'a, T> BandBase<&'a [T]> {
    /// Construct a band view over `data` for an `n x n` matrix with `kd` off-diagonals
    /// and leading dimension `ld`.
    ///
    /// # Panics
    ///
    /// * Panics if `ld < kd + 1`.
    pub fn try_shrink_from(
        data: &'a [T],
        shape: BandShape,
        n: usize,
        kd: usize,
        ld: usize,
    ) -> Result<Self, TryFromError> {
        assert!(ld > kd, "leading dimension must exceed the bandwidth");
        let nrows = if n == 0 { 0 } else { kd + 1 };
        let storage = ColumnMajorBase::try_shrink_from(data, nrows, n, ld)?;
        Ok(Self { storage, kd, shape })
    }
}

impl<T> BandBase<T>
where
    T: DenseData,
{
    /// Return the order `n` of the logical matrix.
    pub fn order(&self) -> usize {
        self.storage.ncols()
    }

    /// Return the number of stored off-diagonals.
    pub fn bandwidth(&self) -> usize {
        self.kd
    }

    /// Return which triangle is stored.
    pub fn shape(&self) -> BandShape {
        self.shape
    }

    /// Return the packed row holding logical element `(row, col)`, or `None` if the element
    /// lies outside the stored triangle of the band.
    pub fn packed_row(&self, row: usize, col: usize) -> Option<usize> {
        if col >= self.order() || row >= self.order() {
            return None;
        }
        match self.shape {
            BandShape::Upper => {
                let delta = col.checked_sub(row)?;
                (delta <= self.kd).then(|| self.kd - delta)
            }
            BandShape::Lower => {
                let delta = row.checked_sub(col)?;
                (delta <= self.kd).then_some(delta)
            }
        }
    }

    /// Return the rows of column `col` holding stored off-diagonal elements, in ascending
    /// order.
    ///
    /// For `BandShape::Upper` this is `max(0, col - kd) .. col`; for `BandShape::Lower`
    /// it is `col + 1 .. min(n, col + kd + 1)`.
    pub fn off_diagonal_rows(&self, col: usize) -> Range<usize> {
        match self.shape {
            BandShape::Upper => col.saturating_sub(self.kd)..col,
            BandShape::Lower => (col + 1)..self.order().min(col + self.kd + 1),
        }
    }

    /// Return the diagonal element of column `col`.
    ///
    /// # Panics
    ///
    /// Panics if `col >= self.order()`.
    pub fn diagonal(&self, col: usize) -> &T::Elem {
        &self[(col, col)]
    }

    /// Return the packed storage.
    pub fn storage(&self) -> &ColumnMajorBase<T> {
        &self.storage
    }
}

/// Return a reference to logical element `(row, col)` of the band matrix.
///
/// # Panics
///
/// Panics if `(row, col)` is outside the stored triangle of the band.
impl<T> Index<(usize, usize)> for BandBase<T>
where
    T: DenseData,
{
    type Output = T::Elem;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        match self.packed_row(row, col) {
            // SAFETY: `packed_row` only returns rows `<= kd` for in-bounds columns.
            Some(packed) => unsafe { self.storage.get_unchecked(packed, col) },
            None => panic!(
                "element ({row}, {col}) is outside the stored {:?} band of width {}",
                self.shape, self.kd
            ),
        }
    }
}

///////////
// Tests //
///////////

/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::ops::{Index, IndexMut};

use thiserror::Error;

use crate::views::{DenseData, MutDenseData};

/// A vector of `len` logical elements spaced `inc` apart in a backing slice.
///
/// The stride may be negative. Following the BLAS convention, a negative stride means
/// the logical elements are laid out in reverse: logical element `0` lives at the highest
/// address used and iteration walks backwards through memory.
///
/// ```text
///   inc = 2              inc = -2
///   x0 . x1 . x2         x2 . x1 . x0
///   ^                              ^
///   start = 0                      start = (len - 1) * |inc|
/// ```
///
/// Physical positions are produced by a [`Cursor`] so that kernels never need to special
/// case the sign of the stride.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StridedBase<T>
where
    T: DenseData,
{
    data: T,
    len: usize,
    inc: isize,
}

/// Return the linear length of a slice underlying a `StridedBase` with `len` elements and
/// stride `inc`.
pub fn linear_length(len: usize, inc: isize) -> usize {
    match len {
        0 => 0,
        len => (len - 1) * inc.unsigned_abs() + 1,
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TryFromError {
    #[error("a strided vector cannot have a stride of zero")]
    ZeroStride,
    #[error(
        "tried to construct a strided vector with {len} elements and stride {inc} over a \
         slice of length {got} (expected at least {expected})"
    )]
    TooShort {
        got: usize,
        expected: usize,
        len: usize,
        inc: isize,
    },
}

/// A physical position within a strided vector that advances by a fixed increment.
///
/// Cursors are created by [`StridedBase::cursor`] or [`StridedBase::cursor_at`] and
/// index the vector they were created from. Positions are allowed to run past either end
/// of the vector after the final element has been visited; indexing with such a cursor
/// panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    position: isize,
    inc: isize,
}

impl Cursor {
    /// Return the current physical position.
    #[inline(always)]
    pub fn position(&self) -> isize {
        self.position
    }

    /// Move to the next logical element.
    #[inline(always)]
    pub fn advance(&mut self) {
        self.position += self.inc;
    }

    /// Return the current cursor and move `self` to the next logical element.
    #[inline(always)]
    pub fn post_increment(&mut self) -> Self {
        let current = *self;
        self.advance();
        current
    }
}

fn physical_index(cursor: Cursor, len: usize) -> usize {
    match usize::try_from(cursor.position) {
        Ok(index) if index < len => index,
        _ => panic!(
            "cursor position {} is out of bounds for a strided vector spanning {} elements",
            cursor.position, len
        ),
    }
}

impl<'a, T> StridedBase<&'a [T]> {
    /// Construct a strided view over `data`, shrinking the slice as needed.
    ///
    /// Returns an error if `inc == 0` or `data` is shorter than `linear_length(len, inc)`.
    pub fn try_shrink_from(data: &'a [T], len: usize, inc: isize) -> Result<Self, TryFromError> {
        if inc == 0 {
            return Err(TryFromError::ZeroStride);
        }
        let expected = linear_length(len, inc);
        match data.get(..expected) {
            Some(data) => Ok(Self { data, len, inc }),
            None => Err(TryFromError::TooShort {
                got: data.len(),
                expected,
                len,
                inc,
            }),
        }
    }
}

impl<'a, T> StridedBase<&'a mut [T]> {
    /// Construct a mutable strided view over `data`, shrinking the slice as needed.
    ///
    /// Returns an error if `inc == 0` or `data` is shorter than `linear_length(len, inc)`.
    pub fn try_shrink_from_mut(
        data: &'a mut [T],
        len: usize,
        inc: isize,
    ) -> Result<Self, TryFromError> {
        if inc == 0 {
            return Err(TryFromError::ZeroStride);
        }
        let expected = linear_length(len, inc);
        let got = data.len();
        if got >= expected {
            Ok(Self {
                data: &mut data[..expected],
                len,
                inc,
            })
        } else {
            Err(TryFromError::TooShort {
                got,
                expected,
                len,
                inc,
            })
        }
    }
}

impl<T> StridedBase<T>
where
    T: DenseData,
{
    /// Return the number of logical elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the vector has no logical elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the stride between consecutive logical elements.
    pub fn inc(&self) -> isize {
        self.inc
    }

    /// Return the physical position of logical element `0`.
    pub fn start(&self) -> isize {
        if self.inc > 0 || self.len == 0 {
            0
        } else {
            (self.len as isize - 1) * -self.inc
        }
    }

    /// Return a cursor positioned at logical element `0`.
    #[inline]
    pub fn cursor(&self) -> Cursor {
        Cursor {
            position: self.start(),
            inc: self.inc,
        }
    }

    /// Return a cursor positioned at logical element `i`.
    ///
    /// `i` may equal `self.len()`, yielding a cursor that must not be dereferenced.
    #[inline]
    pub fn cursor_at(&self, i: usize) -> Cursor {
        debug_assert!(i <= self.len);
        Cursor {
            position: self.start() + i as isize * self.inc,
            inc: self.inc,
        }
    }

    /// Return the underlying data as a slice.
    ///
    /// # Note
    ///
    /// For `|inc| > 1` the slice contains elements that are not part of the vector.
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

    /// Return `true` if the logical elements are contiguous and in memory order.
    pub fn is_contiguous(&self) -> bool {
        self.inc == 1
    }

    /// Return an iterator over the logical elements in logical order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T::Elem> + '_ {
        let mut cursor = self.cursor();
        (0..self.len).map(move |_| &self[cursor.post_increment()])
    }
}

/// Strided view over immutable data.
pub type StridedView<'a, T> = StridedBase<&'a [T]>;

/// Strided view over mutable data.
pub type MutStridedView<'a, T> = StridedBase<&'a mut [T]>;

/// Return a reference to the element at the cursor's physical position.
///
/// # Panics
///
/// Panics if the cursor lies outside the backing slice.
impl<T> Index<Cursor> for StridedBase<T>
where
    T: DenseData,
{
    type Output = T::Elem;

    #[inline]
    fn index(&self, cursor: Cursor) -> &Self::Output {
        let slice = self.data.as_slice();
        let index = physical_index(cursor, slice.len());
        // SAFETY: `physical_index` checked the position against the slice length.
        unsafe { slice.get_unchecked(index) }
    }
}

/// Return a mutable reference to the element at the cursor's physical position.
///
/// # Panics
///
/// Panics if the cursor lies outside the backing slice.
impl<T> IndexMut<Cursor> for StridedBase<T>
where
    T: MutDenseData,
{
    #[inline]
    fn index_mut(&mut self, cursor: Cursor) -> &mut Self::Output {
        let slice = self.data.as_mut_slice();
        let index = physical_index(cursor, slice.len());
        // SAFETY: `physical_index` checked the position against the slice length.
        unsafe { slice.get_unchecked_mut(index) }
    }
}

/// Return a reference to logical element `i`.
///
/// # Panics
///
/// Panics if `i >= self.len()`.
impl<T> Index<usize> for StridedBase<T>
where
    T: DenseData,
{
    type Output = T::Elem;

    #[inline]
    fn index(&self, i: usize) -> &Self::Output {
        assert!(
            i < self.len,
            "index {i} is out of bounds for a strided vector of length {}",
            self.len
        );
        &self[self.cursor_at(i)]
    }
}

/// Return a mutable reference to logical element `i`.
///
/// # Panics
///
/// Panics if `i >= self.len()`.
impl<T> IndexMut<usize> for StridedBase<T>
where
    T: MutDenseData,
{
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        assert!(
            i < self.len,
            "index {i} is out of bounds for a strided vector of length {}",
            self.len
        );
        let cursor = self.cursor_at(i);
        &mut self[cursor]
    }
}

///////////
// Tests //
///////////

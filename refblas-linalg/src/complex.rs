/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::ops::{Index, IndexMut};

use num_complex::Complex;

use crate::BlasError;

/// A complex-valued buffer stored as separate real and imaginary component arrays.
///
/// Both components share one addressing scheme: the element at linear offset `p` is
/// `re[p] + i * im[p]`. The imaginary component is optional at construction so callers
/// holding only real data can be rejected with
/// [`BlasError::MissingImaginaryComponent`] instead of a panic.
#[derive(Debug)]
pub struct SplitComplex<T> {
    re: T,
    im: Option<T>,
}

impl<T> SplitComplex<T> {
    /// Construct a buffer from both components.
    pub fn new(re: T, im: T) -> Self {
        Self { re, im: Some(im) }
    }

    /// Construct a buffer whose imaginary component may be absent.
    pub fn from_parts(re: T, im: Option<T>) -> Self {
        Self { re, im }
    }

    /// Return the real component.
    pub fn re(&self) -> &T {
        &self.re
    }

    /// Return the imaginary component, if present.
    pub fn im(&self) -> Option<&T> {
        self.im.as_ref()
    }

    /// Split into both components, failing if the imaginary component is missing.
    pub(crate) fn require(self, buffer: &'static str) -> Result<(T, T), BlasError> {
        match self.im {
            Some(im) => Ok((self.re, im)),
            None => Err(BlasError::missing_imaginary_component(buffer)),
        }
    }
}

/// Two identically shaped views over the real and imaginary components of a complex
/// array.
///
/// Any index accepted by the component views (a `(row, col)` pair, a strided cursor)
/// loads or stores a whole [`Complex`] value.
#[derive(Debug)]
pub(crate) struct Parts<V> {
    pub(crate) re: V,
    pub(crate) im: V,
}

impl<V> Parts<V> {
    #[inline(always)]
    pub(crate) fn load<I, T>(&self, index: I) -> Complex<T>
    where
        I: Copy,
        T: Copy,
        V: Index<I, Output = T>,
    {
        Complex::new(self.re[index], self.im[index])
    }

    #[inline(always)]
    pub(crate) fn store<I, T>(&mut self, index: I, value: Complex<T>)
    where
        I: Copy,
        V: IndexMut<I, Output = T>,
    {
        self.re[index] = value.re;
        self.im[index] = value.im;
    }
}

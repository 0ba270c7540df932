/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use refblas_utils::views::BandShape;

/// Indicate whether a matrix should be implicitly transposed for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    /// Use a provided matrix directly.
    None,
    /// Use the transpose of a matrix.
    Ordinary,
}

impl Transpose {
    /// Parse a BLAS transpose code.
    ///
    /// Accepts `N`, `T` and `C` in either case. Over the reals the conjugate transpose is
    /// the ordinary transpose, so `C` maps to `Transpose::Ordinary`.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'N' => Some(Self::None),
            'T' | 'C' => Some(Self::Ordinary),
            _ => None,
        }
    }

    /// Return whether or not the enum is `Transpose::Ordinary`.
    pub fn is_transpose(&self) -> bool {
        match self {
            Self::None => false,
            Self::Ordinary => true,
        }
    }
}

/// Which triangle of a matrix is referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uplo {
    Upper,
    Lower,
}

impl Uplo {
    /// Parse a BLAS triangle code (`U` or `L`, either case).
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'U' => Some(Self::Upper),
            'L' => Some(Self::Lower),
            _ => None,
        }
    }
}

impl From<Uplo> for BandShape {
    fn from(uplo: Uplo) -> Self {
        match uplo {
            Uplo::Upper => BandShape::Upper,
            Uplo::Lower => BandShape::Lower,
        }
    }
}

/// Which side of `B` the triangular matrix multiplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// `B := alpha * op(A) * B`.
    Left,
    /// `B := alpha * B * op(A)`.
    Right,
}

impl Side {
    /// Parse a BLAS side code (`L` or `R`, either case).
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'L' => Some(Self::Left),
            'R' => Some(Self::Right),
            _ => None,
        }
    }
}

/// Whether the diagonal of a triangular matrix is stored or implicitly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diag {
    /// The diagonal is assumed to be all ones and is never read.
    Unit,
    /// The diagonal is read from storage.
    NonUnit,
}

impl Diag {
    /// Parse a BLAS diagonal code (`U` or `N`, either case).
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'U' => Some(Self::Unit),
            'N' => Some(Self::NonUnit),
            _ => None,
        }
    }

    /// Return `true` if diagonal entries must be read from storage.
    pub fn is_non_unit(&self) -> bool {
        matches!(self, Self::NonUnit)
    }
}

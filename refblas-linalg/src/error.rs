/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use thiserror::Error;

/// Errors returned by the kernels in this crate.
///
/// Every error is produced before the output buffer is written.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BlasError {
    /// Argument number `position` (1-based, in the order of the reference BLAS signature)
    /// of `routine` failed validation.
    #[error("on entry to {routine}, parameter number {position} had an illegal value")]
    InvalidArgument {
        routine: &'static str,
        position: usize,
    },
    /// A complex-valued argument was supplied without its imaginary component.
    #[error("complex argument `{buffer}` is missing its imaginary component")]
    MissingImaginaryComponent { buffer: &'static str },
}

impl BlasError {
    pub(crate) fn invalid_argument(routine: &'static str, position: usize) -> Self {
        tracing::debug!(routine, position, "rejected invalid argument");
        Self::InvalidArgument { routine, position }
    }

    pub(crate) fn missing_imaginary_component(buffer: &'static str) -> Self {
        tracing::debug!(buffer, "rejected complex argument without imaginary component");
        Self::MissingImaginaryComponent { buffer }
    }

    /// Return the failing parameter position for `InvalidArgument` errors.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::InvalidArgument { position, .. } => Some(*position),
            Self::MissingImaginaryComponent { .. } => None,
        }
    }
}

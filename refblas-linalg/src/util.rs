/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::fmt::Display;

/// Convert a BLAS dimension argument, returning `None` if it is negative.
pub(crate) fn dimension(value: i32) -> Option<usize> {
    usize::try_from(value).ok()
}

/// Unwrap a storage view constructed over a caller-provided buffer.
///
/// Arguments have already been validated, so the only remaining failure is a buffer too
/// short for its declared shape. That is a caller bug and is reported by panicking
/// before any output is written.
#[track_caller]
pub(crate) fn expect_view<V, E: Display>(
    view: Result<V, E>,
    routine: &'static str,
    argument: &'static str,
) -> V {
    match view {
        Ok(view) => view,
        Err(err) => panic!("{routine}: argument `{argument}`: {err}"),
    }
}

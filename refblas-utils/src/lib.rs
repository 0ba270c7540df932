/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Storage accessors shared by the reference kernels in `refblas-linalg`.
//!
//! * [`views`]: column-major dense and band matrices addressed by leading dimension.
//! * [`strided`]: strided vectors with signed strides and [`strided::Cursor`] iteration.

// Views
pub mod strided;
pub mod views;

#[cfg(feature = "testing")]
#[doc(hidden)]
pub mod tracing;


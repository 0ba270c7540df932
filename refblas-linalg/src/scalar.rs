/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::fmt::Debug;

use num_traits::{Float, NumAssign};

/// Real element types supported by the kernels.
///
/// Both precisions run the same scalar algorithm; nothing is ever converted between
/// them.
pub trait Real: Float + NumAssign + Debug + Default + Send + Sync + 'static {
    /// Name of the triangular matrix-matrix routine for this precision.
    const TRMM: &'static str;

    /// Name of the Hermitian band matrix-vector routine for complex numbers built from
    /// this precision.
    const HBMV: &'static str;
}

impl Real for f32 {
    const TRMM: &'static str = "strmm";
    const HBMV: &'static str = "chbmv";
}

impl Real for f64 {
    const TRMM: &'static str = "dtrmm";
    const HBMV: &'static str = "zhbmv";
}

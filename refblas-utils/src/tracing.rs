/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Install a thread-local subscriber that writes kernel events to the test harness.
///
/// The filter respects `RUST_LOG` and falls back to `debug` so rejected calls are visible
/// when a test fails. Events only reach the subscriber while the returned guard lives.
pub fn init_test_subscriber() -> ::tracing::subscriber::DefaultGuard {
    let fmt_layer = fmt::layer().with_target(true).with_test_writer();

    let filter_layer = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .set_default()
}

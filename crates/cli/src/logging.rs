// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use anyhow::{anyhow, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

/// Install the global subscriber
///
/// `level` takes precedence over `RUST_LOG`; the default is `warn`. With a
/// log file, output goes there through a non-blocking writer and the
/// returned guard must be held until exit to flush it.
pub fn setup_logging(level: Option<&str>, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let registry = tracing_subscriber::registry().with(filter);

    let Some(path) = file else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file has no name: {}", path.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    registry
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();
    Ok(Some(guard))
}

//! Tracing configuration for the dashboard CLI
//!
//! - **Environment filter**: respects `RUST_LOG`, with per-crate defaults
//! - **stderr**: stdout is reserved for command output
//! - **File**: `<data_dir>/logs/cy-dashboard.log` when the directory is writable

use std::path::Path;
use std::{fs, io, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_NAME: &str = "cy-dashboard.log";

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives.
///
/// The CLI itself is quiet (`warn`) unless asked; the sheet client and the
/// app layer log one level lower so sync problems end up in the file log.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        if is_dev { "info" } else { "warn" }.to_string(),
        if is_dev { "cy_infra=debug" } else { "cy_infra=info" }.to_string(),
        if is_dev { "cy_app=debug" } else { "cy_app=info" }.to_string(),
        "reqwest=warn".to_string(),
        "hyper_util=warn".to_string(),
    ]
}

/// Initialize the global tracing subscriber.
///
/// Call once, before any logging occurs.
///
/// ## Errors
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing_subscriber(logs_dir: Option<&Path>) -> anyhow::Result<()> {
    let is_dev = is_development();

    // Step 1: Build environment filter
    let filter_directives = build_filter_directives(is_dev);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    // Step 2: Create writers
    let stderr_writer: BoxMakeWriter = BoxMakeWriter::new(io::stderr);
    let file_writer = match logs_dir.map(build_file_writer).transpose() {
        Ok(writer) => writer,
        Err(err) => {
            eprintln!("Failed to initialize file logging, continuing with stderr only: {err}");
            None
        }
    };

    // Step 3: Create fmt layers
    // "2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stderr_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_level(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stderr_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(
                "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            ))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    // Step 4: Register the global subscriber
    let subscriber = registry().with(env_filter).with(stderr_layer);

    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

fn build_file_writer(logs_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(logs_dir)?;

    let file_appender = tracing_appender::rolling::never(logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_directives() {
        let dev_directives = build_filter_directives(true);
        assert!(dev_directives.contains(&"info".to_string()));
        assert!(dev_directives.contains(&"cy_infra=debug".to_string()));
        assert!(dev_directives.contains(&"cy_app=debug".to_string()));

        let prod_directives = build_filter_directives(false);
        assert!(prod_directives.contains(&"warn".to_string()));
        assert!(prod_directives.contains(&"cy_infra=info".to_string()));
        assert!(prod_directives.contains(&"reqwest=warn".to_string()));
    }
}

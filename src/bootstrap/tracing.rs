//! Tracing configuration for the photo gallery host
//!
//! - **Environment filter**: `RUST_LOG` wins; otherwise debug in
//!   development builds and info in release builds
//! - **Writers**: stdout always, plus a log file in the platform data
//!   directory when file logging is enabled
//! - **Sentry**: error reporting layer, only when `SENTRY_DSN` is set

use std::{fs, io, path::PathBuf, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static SENTRY_GUARD: OnceLock<sentry::ClientInitGuard> = OnceLock::new();

const LOG_FILE_NAME: &str = "photo-gallery.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let crate_level = if is_dev { "debug" } else { "info" };
    vec![
        crate_level.to_string(),
        format!("gallery_core={crate_level}"),
        format!("gallery_app={crate_level}"),
        format!("gallery_infra={crate_level}"),
        "sentry=warn".to_string(),
    ]
}

/// Platform log directory, e.g. `~/.local/share/photo-gallery/logs`.
pub fn logs_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("photo-gallery").join("logs"))
}

/// Initialize the tracing subscriber
///
/// Call once from `main`, after the configuration is loaded and before the
/// gallery is wired.
///
/// ## Errors
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(file_logging: bool) -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    let sentry_layer = if let Ok(dsn) = std::env::var("SENTRY_DSN") {
        let guard = sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                traces_sample_rate: 1.0,
                ..Default::default()
            },
        ));

        if SENTRY_GUARD.set(guard).is_err() {
            eprintln!("Sentry guard already initialized");
        }

        Some(sentry_tracing::layer())
    } else {
        None
    };

    let stdout_writer: BoxMakeWriter = BoxMakeWriter::new(io::stdout);
    let file_writer = if file_logging {
        match build_file_writer() {
            Ok(writer) => Some(writer),
            Err(err) => {
                eprintln!("Failed to initialize file logging, falling back to stdout: {err}");
                None
            }
        }
    } else {
        None
    };

    // "2026-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stdout_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    registry()
        .with(env_filter)
        .with(sentry_layer)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn build_file_writer() -> anyhow::Result<NonBlocking> {
    let logs_dir =
        logs_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine the platform log directory"))?;
    fs::create_dir_all(&logs_dir)?;

    let file_appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

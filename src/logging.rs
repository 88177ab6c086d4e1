//! Structured JSONL logging for tooling and human-readable stderr output.
//!
//! This module provides dual-output logging:
//! - **JSONL to file** (~/.project-launcher/logs/launcher-core.jsonl) - structured for parsing
//! - **Pretty to stderr** - human-readable for developers
//!
//! # Usage
//!
//! ```rust,ignore
//! use launcher_core::logging;
//!
//! // Initialize logging - MUST keep guard alive for duration of program
//! let _guard = logging::init();
//!
//! tracing::info!(event_type = "search", query = "bar", "Ranked projects");
//! ```
//!
//! # JSONL Output Format
//!
//! Each line is a valid JSON object:
//! ```json
//! {"timestamp":"2026-10-19T10:30:45.123Z","level":"INFO","target":"launcher_core::projects::index","fields":{"message":"Project index rebuilt","generation":3,"projects":42}}
//! ```

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_NAME: &str = "launcher-core.jsonl";

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the dual-output logging system.
///
/// Returns a guard that MUST be kept alive for the duration of the program.
/// If the log file cannot be opened, only the stderr layer is installed.
pub fn init() -> LoggingGuard {
    let log_dir = get_log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_path();

    // Environment filter - default to info, allow override via RUST_LOG
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = OpenOptions::new().create(true).append(true).open(&log_path);

    let (file_writer, file_guard, open_error) = match file {
        Ok(file) => {
            let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file);
            (Some(non_blocking_file), Some(file_guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    build_subscriber(env_filter, file_writer).init();

    match open_error {
        None => tracing::info!(
            event_type = "app_lifecycle",
            action = "started",
            log_path = %log_path.display(),
            "Logging initialized"
        ),
        Some(e) => tracing::warn!(
            error = %e,
            log_path = %log_path.display(),
            "Failed to open log file, logging to stderr only"
        ),
    }

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// Layer stack behind `init`: env filter, optional JSONL file layer, stderr.
fn build_subscriber(
    env_filter: EnvFilter,
    file_writer: Option<NonBlocking>,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    // JSONL layer for file output
    let json_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(false)
            .with_line_number(false)
            .with_span_events(FmtSpan::NONE)
    });

    // Pretty layer for stderr (human developers). stdout carries the JSONL protocol.
    let pretty_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
}

/// Get the log directory path (~/.project-launcher/logs/)
fn get_log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".project-launcher").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("project-launcher-logs"))
}

/// Get the path to the JSONL log file
fn log_path() -> PathBuf {
    get_log_dir().join(LOG_FILE_NAME)
}

/// Log a raw key event as seen by the shortcut recorder.
pub fn log_key_event(code: &str, modifiers: &str, action: &str) {
    tracing::debug!(
        category = "KEY",
        event_type = "key_event",
        code = code,
        modifiers = modifiers,
        action = action,
        "Key {} {} ({})",
        action,
        code,
        modifiers
    );
}

/// Log an operation duration, escalating to a warning above `threshold_ms`.
pub fn log_perf(operation: &str, duration_ms: u64, threshold_ms: u64) {
    if duration_ms > threshold_ms {
        tracing::warn!(
            category = "PERF",
            event_type = "perf_slow",
            operation = operation,
            duration_ms = duration_ms,
            threshold_ms = threshold_ms,
            "{} took {}ms (threshold {}ms)",
            operation,
            duration_ms,
            threshold_ms
        );
    } else {
        tracing::debug!(
            category = "PERF",
            event_type = "perf",
            operation = operation,
            duration_ms = duration_ms,
            "{} took {}ms",
            operation,
            duration_ms
        );
    }
}

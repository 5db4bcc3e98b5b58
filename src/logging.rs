//! Tracing configuration and log routing.
//!
//! The server logs to stdout with a compact formatter and mirrors everything into a log file:
//! `STUDY_HELPER_LOG_FILE` when set, `logs/study-helper.log` otherwise. The CLI only writes
//! warnings to stderr so stdout stays clean for the generated notes.
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_ENV: &str = "STUDY_HELPER_LOG_FILE";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "study-helper.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the server subscriber: `RUST_LOG` filter (default `info`), stdout, and a file layer.
///
/// The file layer is skipped with a notice on stderr when the target cannot be opened.
pub fn init_tracing() {
    let file_layer = file_writer().map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(fmt::layer().with_target(false).compact())
        .with(file_layer)
        .init();
}

/// Install a stderr-only subscriber for command-line use (default `warn`).
pub fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(env_filter("warn"))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

fn log_file_path() -> PathBuf {
    std::env::var(LOG_FILE_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(DEFAULT_LOG_DIR).join(DEFAULT_LOG_FILE))
}

/// Open the log file in append mode behind a non-blocking writer.
///
/// The worker guard is parked in a static so buffered lines flush for the process lifetime.
fn file_writer() -> Option<NonBlocking> {
    let path = log_file_path();
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if let Err(err) = std::fs::create_dir_all(parent) {
            eprintln!("Failed to create log directory {}: {err}", parent.display());
            return None;
        }
    }

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(non_blocking)
        }
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.display());
            None
        }
    }
}

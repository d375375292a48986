// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The destination comes from the `--log` flag: the literal `os.Stdout`
//! keeps logs on standard output, any other value is treated as a file
//! path opened append-only (created `0644` if missing). `--debug` raises
//! the maximum level from INFO to DEBUG; debug-level lines carry worker
//! ordinals and raw upstream error dumps.
//!
//! Timestamps are UTC; every line carries the emitting file:line.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::fmt;

/// `--log` value meaning "standard output".
pub const LOG_TO_STDOUT: &str = "os.Stdout";

/// Initialise the global subscriber. Call once, before any pipeline
/// stage starts; a log file that cannot be opened is a fatal error.
pub fn init_logging(log_dest: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    if log_dest == LOG_TO_STDOUT {
        fmt()
            .with_max_level(level)
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .init();
        return Ok(());
    }

    let path = std::path::absolute(log_dest)
        .with_context(|| format!("resolving log path {log_dest:?}"))?;
    let file =
        open_append(&path).with_context(|| format!("opening log file at {path:?}"))?;

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

#[cfg(unix)]
fn open_append(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o644)
        .open(path)
}

#[cfg(not(unix))]
fn open_append(path: &Path) -> std::io::Result<std::fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}

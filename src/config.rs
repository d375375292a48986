// src/config.rs

//! Runner configuration assembled from CLI arguments.
//!
//! Paths are made absolute and checked for existence up front; a runner
//! pointed at a missing WP-CLI binary or installation refuses to start
//! instead of failing on every invocation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::cli::CliArgs;

/// Immutable runtime configuration, validated at startup.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Absolute path to the WP-CLI binary.
    pub cli_path: PathBuf,
    /// WordPress network ID; appended to every invocation when `> 0`.
    pub network: i64,
    /// Absolute path to the WordPress installation.
    pub wp_path: PathBuf,
    /// Size of the event-retriever pool.
    pub workers_get: usize,
    /// Size of the event-worker pool.
    pub workers_run: usize,
    /// Seconds between site-discovery cycles.
    pub get_events_interval: u64,
    /// Seconds between heartbeat lines; `0` disables emission.
    pub heartbeat: u64,
}

impl RunnerConfig {
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let cli_path = validate_path(&args.cli, "WP-CLI path")?;
        let wp_path = validate_path(&args.wp, "WordPress path")?;

        Ok(Self {
            cli_path,
            network: args.network,
            wp_path,
            workers_get: args.workers_get,
            workers_run: args.workers_run,
            get_events_interval: args.get_events_interval,
            heartbeat: args.heartbeat,
        })
    }
}

/// Resolve `path` to an absolute path and require that it exists.
fn validate_path(path: &str, label: &str) -> Result<PathBuf> {
    if path.len() <= 1 {
        bail!("empty path provided for {label}");
    }

    let abs = std::path::absolute(path)
        .with_context(|| format!("resolving {label} {path:?}"))?;
    if !abs.exists() {
        bail!("{label} {abs:?} does not exist");
    }

    Ok(abs)
}

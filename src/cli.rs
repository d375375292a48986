// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::Parser;

use crate::logging::LOG_TO_STDOUT;

/// Command-line arguments for `cron-runner`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cron-runner",
    version,
    about = "Runs scheduled WordPress cron events through WP-CLI.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the WP-CLI binary.
    #[arg(long = "cli", value_name = "PATH", default_value = "/usr/local/bin/wp")]
    pub cli: String,

    /// WordPress network ID, `0` to disable.
    #[arg(long, value_name = "ID", default_value_t = 0)]
    pub network: i64,

    /// Path to the WordPress installation.
    #[arg(long = "wp", value_name = "PATH", default_value = "/var/www/html")]
    pub wp: String,

    /// Number of workers retrieving events.
    #[arg(long = "workers-get", value_name = "N", default_value_t = 1)]
    pub workers_get: usize,

    /// Number of workers running events.
    #[arg(long = "workers-run", value_name = "N", default_value_t = 5)]
    pub workers_run: usize,

    /// Seconds between site-discovery cycles.
    #[arg(long = "get-events-interval", value_name = "SECONDS", default_value_t = 60)]
    pub get_events_interval: u64,

    /// Heartbeat interval in seconds, `0` to disable emission.
    #[arg(long, value_name = "SECONDS", default_value_t = 60)]
    pub heartbeat: u64,

    /// Log destination. The literal `os.Stdout` keeps logs on standard
    /// output; any other value is a file path opened append-only.
    #[arg(long, value_name = "PATH", default_value = LOG_TO_STDOUT)]
    pub log: String,

    /// Include additional log data for debugging.
    #[arg(long)]
    pub debug: bool,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

// src/wp/invoker.rs

//! Real WP-CLI invoker backed by `tokio::process`.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{bail, Context};
use tokio::process::Command;
use tracing::debug;

use crate::config::RunnerConfig;
use crate::errors::Result;

use super::backend::CliBackend;

/// Production backend: spawns the configured WP-CLI binary and waits for
/// it to finish. No retries, no timeout — the tool is trusted to return.
pub struct WpCli {
    cli_path: PathBuf,
    wp_path: PathBuf,
    network: i64,
}

impl WpCli {
    pub fn new(cfg: &RunnerConfig) -> Self {
        Self {
            cli_path: cfg.cli_path.clone(),
            wp_path: cfg.wp_path.clone(),
            network: cfg.network,
        }
    }

    /// Append the fixed trailing arguments every invocation carries.
    ///
    /// `--quiet` keeps WP-CLI notices from corrupting JSON output.
    fn full_args(&self, mut subcommand: Vec<String>) -> Vec<String> {
        subcommand.push("--allow-root".to_string());
        subcommand.push("--quiet".to_string());
        subcommand.push(format!("--path={}", self.wp_path.display()));
        if self.network > 0 {
            subcommand.push(format!("--network={}", self.network));
        }
        subcommand
    }
}

impl CliBackend for WpCli {
    fn invoke(
        &self,
        subcommand: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        let args = self.full_args(subcommand);
        let cli_path = self.cli_path.clone();

        Box::pin(async move {
            let output = Command::new(&cli_path)
                .args(&args)
                .stdin(Stdio::null())
                .output()
                .await
                .with_context(|| format!("spawning {cli_path:?}"))?;

            // Merge the streams; callers treat the text as opaque.
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));

            if !output.status.success() {
                debug!(args = ?args, output = %combined, "wp-cli exited non-zero");
                bail!("wp-cli exited with {}", output.status);
            }

            Ok(combined)
        })
    }
}

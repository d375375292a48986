// src/wp/backend.rs

//! Pluggable WP-CLI backend abstraction.
//!
//! The pipeline stages talk to a [`CliBackend`] instead of spawning
//! processes directly. This keeps the production invoker in
//! [`invoker`](super::invoker) and lets tests substitute a scripted fake
//! that never forks.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

/// Trait abstracting how WP-CLI subcommands are executed.
///
/// Production code uses [`WpCli`](super::WpCli); tests can provide their
/// own implementation that records invocations and replays canned output.
pub trait CliBackend: Send + Sync {
    /// Run one subcommand and return its combined stdout/stderr.
    ///
    /// `Err` means the process could not be spawned or exited non-zero;
    /// callers treat both the same way and skip the current unit of work.
    /// The output is opaque at this layer — callers expecting JSON decode
    /// it themselves.
    fn invoke(
        &self,
        subcommand: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>>;
}

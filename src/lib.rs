// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod signals;
pub mod types;
pub mod wp;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::RunnerConfig;
use crate::engine::{heartbeat, retrievers, sites, workers, RunnerState};
use crate::wp::{CliBackend, WpCli};

/// High-level entry point used by `main.rs`.
///
/// Wires together:
/// - the shared runner state
/// - the signal listener
/// - the three pipeline stages (site discovery, event retrieval, event
///   execution) connected by bounded channels
/// - the heartbeat/drain controller
///
/// Returns after a clean drain; the caller exits 0.
pub async fn run(cfg: RunnerConfig) -> Result<()> {
    info!(
        "starting with {} event-retrieval worker(s) and {} event worker(s)",
        cfg.workers_get, cfg.workers_run
    );
    info!("retrieving events every {} seconds", cfg.get_events_interval);

    let state = Arc::new(RunnerState::new(cfg.workers_get, cfg.workers_run));
    let backend: Arc<dyn CliBackend> = Arc::new(WpCli::new(&cfg));

    // Each channel is sized to its consumer pool: one drain pass can then
    // buffer a sentinel for every blocked member instead of waking one
    // member per poll tick.
    let (sites_tx, sites_rx) = mpsc::channel(cfg.workers_get.max(1));
    let (events_tx, events_rx) = mpsc::channel(cfg.workers_run.max(1));

    signals::spawn_signal_listener(state.clone());

    retrievers::spawn_event_retrievers(
        &state,
        &backend,
        sites_rx,
        events_tx.clone(),
        cfg.workers_get,
    );
    workers::spawn_event_workers(
        &state,
        &backend,
        events_rx,
        cfg.workers_run,
        cfg.heartbeat > 0,
        workers::RUN_EVENTS_BREAK_SECS,
    );

    tokio::spawn(sites::retrieve_sites_periodically(
        state.clone(),
        backend.clone(),
        cfg.clone(),
        sites_tx.clone(),
    ));

    heartbeat::heartbeat(state, cfg.heartbeat, sites_tx, events_tx).await;
    Ok(())
}

// src/engine/workers.rs

//! Event execution: the final pipeline stage.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::types::Event;
use crate::wp::CliBackend;

use super::epoch::{unix_now_secs, wait_for_epoch};
use super::state::RunnerState;

/// Epoch period of the post-run pacing wait; bounds per-worker QPS.
pub const RUN_EVENTS_BREAK_SECS: u64 = 10;

/// Internal events receiver shared by the whole pool.
pub type SharedEventRx = Arc<Mutex<mpsc::Receiver<Event>>>;

/// Spawn the worker pool plus its fan-in coordinator.
///
/// The coordinator owns the only receiver of the main events channel and
/// the only sender of the internal one; when the main channel closes it
/// drops the internal sender, which terminates every worker. One closing
/// owner, however many consumers.
pub fn spawn_event_workers(
    state: &Arc<RunnerState>,
    backend: &Arc<dyn CliBackend>,
    mut events_rx: mpsc::Receiver<Event>,
    count: usize,
    heartbeat_enabled: bool,
    break_secs: u64,
) {
    // Sized to the pool, like the main channels, so drain sentinels for
    // every member can sit buffered at once.
    let (worker_tx, worker_rx) = mpsc::channel(count.max(1));
    let worker_rx: SharedEventRx = Arc::new(Mutex::new(worker_rx));

    for ordinal in 1..=count {
        tokio::spawn(run_events(
            ordinal,
            state.clone(),
            backend.clone(),
            worker_rx.clone(),
            heartbeat_enabled,
            break_secs,
        ));
    }

    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            if worker_tx.send(event).await.is_err() {
                break;
            }
        }
    });
}

/// One event worker: execute due events, skip premature ones, account
/// the outcome, and pace itself between attempts.
///
/// The shutdown check sits before anything else so a drain sentinel
/// (zero timestamp, which would otherwise count as due) is consumed but
/// never executed.
pub async fn run_events(
    ordinal: usize,
    state: Arc<RunnerState>,
    backend: Arc<dyn CliBackend>,
    events_rx: SharedEventRx,
    heartbeat_enabled: bool,
    break_secs: u64,
) {
    state.set_worker_live(ordinal, true);
    info!("started event worker {ordinal}");

    loop {
        let received = { events_rx.lock().await.recv().await };
        let Some(event) = received else { break };

        if state.is_shutting_down() {
            info!("exiting event worker {ordinal}");
            break;
        }

        if event.timestamp > unix_now_secs() {
            // Premature; the upstream surfaces it again on a later fetch.
            debug!(
                worker = ordinal,
                timestamp = event.timestamp,
                action = %event.action,
                instance = %event.instance,
                url = %event.url,
                "skipping premature event"
            );
            continue;
        }

        let result = backend
            .invoke(vec![
                "cron-control".to_string(),
                "orchestrate".to_string(),
                "runner-only".to_string(),
                "run".to_string(),
                format!("--timestamp={}", event.timestamp),
                format!("--action={}", event.action),
                format!("--instance={}", event.instance),
                format!("--url={}", event.url),
            ])
            .await;

        match result {
            Ok(_) => {
                if heartbeat_enabled {
                    state.record_success();
                }
                debug!(
                    worker = ordinal,
                    timestamp = event.timestamp,
                    action = %event.action,
                    instance = %event.instance,
                    url = %event.url,
                    "finished event"
                );
            }
            Err(err) => {
                if heartbeat_enabled {
                    state.record_error();
                }
                debug!(worker = ordinal, error = %err, "event run failed");
            }
        }

        wait_for_epoch(&state, "run-events", break_secs).await;
        if state.is_shutting_down() {
            info!("exiting event worker {ordinal}");
            break;
        }
    }

    state.set_worker_live(ordinal, false);
}

// src/engine/heartbeat.rs

//! Heartbeat emission and shutdown drain.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use crate::types::{Event, Site};

use super::epoch::wait_for_epoch;
use super::state::RunnerState;

/// How often the drain loop re-checks the liveness registries.
const DRAIN_POLL: Duration = Duration::from_secs(3);

/// Idle waiter period used when heartbeat emission is disabled; shutdown
/// monitoring continues at this cadence.
const IDLE_PERIOD_SECS: u64 = 60;

/// Run the heartbeat loop until shutdown, then drain every pool.
///
/// Drain is entered on the shutdown flag regardless of whether emission
/// is enabled. Returns once both liveness registries are all-false; the
/// caller exits the process cleanly afterwards.
pub async fn heartbeat(
    state: Arc<RunnerState>,
    heartbeat_secs: u64,
    sites_tx: mpsc::Sender<Site>,
    events_tx: mpsc::Sender<Event>,
) {
    if heartbeat_secs == 0 {
        info!("heartbeat disabled");
        loop {
            wait_for_epoch(&state, "heartbeat", IDLE_PERIOD_SECS).await;
            if state.is_shutting_down() {
                info!("exiting heartbeat loop");
                break;
            }
        }
    } else {
        loop {
            wait_for_epoch(&state, "heartbeat", heartbeat_secs).await;
            if state.is_shutting_down() {
                info!("exiting heartbeat loop");
                break;
            }
            let (succeeded, errored) = state.take_heartbeat_counts();
            info!(
                "<heartbeat eventsSucceededSinceLast={succeeded} eventsErroredSinceLast={errored}>"
            );
        }
    }

    drain(&state, &sites_tx, &events_tx).await;
}

/// Wake channel-blocked workers with sentinel messages until every pool
/// member has marked itself not-running.
///
/// The channels are sized to their pools, so a single pass can buffer a
/// sentinel for every blocked member. Sentinels go out with `try_send`: a
/// full slot already holds a message that will wake a consumer, so
/// skipping the push there loses nothing, and the drain loop can never
/// block on a pool that has already exited.
pub async fn drain(
    state: &RunnerState,
    sites_tx: &mpsc::Sender<Site>,
    events_tx: &mpsc::Sender<Event>,
) {
    loop {
        let live_retrievers = state.live_retrievers();
        let live_workers = state.live_workers();

        if live_retrievers.is_empty() && live_workers.is_empty() {
            info!("all workers drained");
            return;
        }

        for ordinal in live_retrievers {
            info!("event retriever {ordinal} still running, sending sentinel site");
            let _ = sites_tx.try_send(Site::default());
        }
        for ordinal in live_workers {
            info!("event worker {ordinal} still running, sending sentinel event");
            let _ = events_tx.try_send(Event::default());
        }

        info!("worker(s) still running, waiting");
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

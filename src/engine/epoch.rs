// src/engine/epoch.rs

//! Phase-aligned periodic waiter.
//!
//! [`wait_for_epoch`] blocks until the next wall-clock instant `T` with
//! `T mod period == offset(label)`, at least one second away. The offset
//! is chosen once per label (see [`RunnerState::epoch_offset`]) so that a
//! fleet of runners with identical configuration does not synchronize
//! its upstream traffic.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::warn;

use super::state::RunnerState;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Upper bound on a single sleep slice; the shutdown flag is re-checked
/// at every slice boundary.
const MAX_SLICE: Duration = Duration::from_secs(3);

/// Sleep until the next aligned epoch boundary for `label`.
///
/// Returns early when shutdown is requested, and aborts with a warning
/// once more than twice the period has elapsed — a clock anomaly can push
/// the target arbitrarily far out, and a forfeited epoch beats a hung
/// loop.
pub async fn wait_for_epoch(state: &RunnerState, label: &str, period_secs: u64) {
    if period_secs == 0 {
        return;
    }

    let period_ns = period_secs * NANOS_PER_SEC;
    let start_ns = unix_now_nanos();

    let mut delta = period_ns - (start_ns % period_ns);
    if delta < NANOS_PER_SEC {
        delta += period_ns;
    }

    let target_ns = start_ns + delta + state.epoch_offset(label, period_ns);

    loop {
        let now = unix_now_nanos();
        if now >= target_ns {
            return;
        }
        if now.saturating_sub(start_ns) > 2 * period_ns {
            warn!(label, period_secs, "epoch wait exceeded twice the period, aborting");
            return;
        }
        if state.is_shutting_down() {
            return;
        }
        let remaining = Duration::from_nanos(target_ns - now);
        tokio::time::sleep(remaining.min(MAX_SLICE)).await;
    }
}

/// Current wall-clock time as nanoseconds since the unix epoch.
pub fn unix_now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Current wall-clock time as whole seconds since the unix epoch.
pub fn unix_now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

// src/engine/backoff.rs

//! Escalating back-off for upstream-disabled instances.
//!
//! When `get-info` reports automation disabled, each consecutive
//! observation adds three minutes of sleep before the discovery loop is
//! allowed to poll again. The counter resets when the instance re-enables,
//! when a disabled-until expiry is imminent, or once the computed sleep
//! passes one hour — which caps the sleep and therefore drain latency.

use std::time::Duration;

use tracing::debug;

use super::epoch::unix_now_secs;
use super::state::RunnerState;

/// Escalation step in seconds: three minutes per consecutive observation.
const STEP_SECS: u64 = 3 * 60;

/// Once the computed sleep exceeds this, the counter resets.
const MAX_SLEEP: Duration = Duration::from_secs(60 * 60);

/// Outcome of one governor consultation, separated from the clock and the
/// shared counter so the policy is directly testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffStep {
    /// Whether site discovery may proceed this cycle.
    pub proceed: bool,
    /// How long to sleep before yielding back to the discovery loop.
    pub sleep: Duration,
    /// The disabled-loop counter value to store for the next cycle.
    pub next_count: u64,
}

/// Pure back-off policy.
///
/// `disabled` is the value reported by `get-info` (`0` enabled, `1`
/// disabled indefinitely, `>1` disabled until that unix timestamp),
/// `count` the consecutive disabled observations so far, `now` the
/// current unix seconds.
pub fn backoff_step(disabled: i64, count: u64, now: i64) -> BackoffStep {
    if disabled == 0 {
        return BackoffStep {
            proceed: true,
            sleep: Duration::ZERO,
            next_count: 0,
        };
    }

    let sleep = Duration::from_secs(STEP_SECS.saturating_mul(count));
    let sleep_secs = sleep.as_secs() as i64;

    let next_count = if disabled > 1 && now + sleep_secs > disabled {
        // The stated disabled-until expiry is imminent.
        0
    } else if sleep > MAX_SLEEP {
        0
    } else {
        count + 1
    };

    BackoffStep {
        proceed: false,
        sleep,
        next_count,
    }
}

/// Consult the governor, apply the counter update, and perform the sleep.
///
/// The sleep intentionally ignores the shutdown flag; it is bounded above
/// by one escalation step past [`MAX_SLEEP`].
pub async fn should_get_sites(state: &RunnerState, disabled: i64) -> bool {
    let step = backoff_step(disabled, state.disabled_loops(), unix_now_secs());
    state.set_disabled_loops(step.next_count);

    if step.proceed {
        return true;
    }

    if step.sleep > Duration::ZERO {
        debug!(
            extra_minutes = step.sleep.as_secs() / 60,
            "automatic execution disabled, backing off"
        );
        tokio::time::sleep(step.sleep).await;
    } else {
        debug!("automatic execution disabled");
    }

    false
}

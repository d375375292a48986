// tests/backoff_policy.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::time::Duration;

use cron_runner::engine::backoff::{backoff_step, should_get_sites};
use cron_runner::engine::RunnerState;

type TestResult = Result<(), Box<dyn Error>>;

const MINUTE: u64 = 60;

#[test]
fn enabled_instance_proceeds_and_resets_the_counter() -> TestResult {
    let step = backoff_step(0, 5, 1_000);

    assert!(step.proceed);
    assert_eq!(step.sleep, Duration::ZERO);
    assert_eq!(step.next_count, 0);

    Ok(())
}

#[test]
fn escalation_adds_three_minutes_per_disabled_observation() -> TestResult {
    let mut count = 0;
    let mut sleeps = Vec::new();

    for _ in 0..10 {
        let step = backoff_step(1, count, 1_000);
        assert!(!step.proceed);
        sleeps.push(step.sleep.as_secs());
        count = step.next_count;
    }

    let expected: Vec<u64> = (0..10).map(|i| i * 3 * MINUTE).collect();
    assert_eq!(sleeps, expected);
    assert_eq!(count, 10);

    Ok(())
}

#[test]
fn counter_resets_once_the_sleep_passes_one_hour() -> TestResult {
    // At twenty observations the sleep reaches exactly one hour and the
    // escalation continues; one step later it exceeds the cap and resets.
    let at_cap = backoff_step(1, 20, 1_000);
    assert_eq!(at_cap.sleep, Duration::from_secs(60 * MINUTE));
    assert_eq!(at_cap.next_count, 21);

    let past_cap = backoff_step(1, 21, 1_000);
    assert_eq!(past_cap.sleep, Duration::from_secs(63 * MINUTE));
    assert_eq!(past_cap.next_count, 0);

    Ok(())
}

#[test]
fn past_expiry_resets_without_sleeping() -> TestResult {
    // Disabled-until 100 with the clock already at 1000: the expiry is
    // imminent (long past), so the counter resets and nothing sleeps.
    let step = backoff_step(100, 0, 1_000);

    assert!(!step.proceed);
    assert_eq!(step.sleep, Duration::ZERO);
    assert_eq!(step.next_count, 0);

    Ok(())
}

#[test]
fn future_expiry_keeps_escalating() -> TestResult {
    let step = backoff_step(1_000_000, 2, 1_000);

    assert!(!step.proceed);
    assert_eq!(step.sleep, Duration::from_secs(6 * MINUTE));
    assert_eq!(step.next_count, 3);

    Ok(())
}

#[tokio::test]
async fn governor_applies_the_counter_to_shared_state() -> TestResult {
    init_tracing();
    let state = RunnerState::new(0, 0);

    assert!(should_get_sites(&state, 0).await);
    assert_eq!(state.disabled_loops(), 0);

    // First disabled observation sleeps zero and bumps the counter.
    assert!(!should_get_sites(&state, 1).await);
    assert_eq!(state.disabled_loops(), 1);

    // Re-enabling resets it.
    assert!(should_get_sites(&state, 0).await);
    assert_eq!(state.disabled_loops(), 0);

    Ok(())
}

// tests/invoker.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::path::PathBuf;

use cron_runner::config::RunnerConfig;
use cron_runner::wp::{CliBackend, WpCli};

type TestResult = Result<(), Box<dyn Error>>;

/// Config pointing the invoker at a real binary; the installation path is
/// only formatted into `--path=`, never touched.
fn config_for(cli: &str, network: i64) -> RunnerConfig {
    RunnerConfig {
        cli_path: PathBuf::from(cli),
        network,
        wp_path: PathBuf::from("/srv/www"),
        workers_get: 1,
        workers_run: 5,
        get_events_interval: 60,
        heartbeat: 60,
    }
}

#[tokio::test]
async fn trailing_arguments_are_appended_to_every_invocation() -> TestResult {
    init_tracing();
    let wp = WpCli::new(&config_for("/bin/echo", 0));

    let out = wp.invoke(vec!["hello".to_string()]).await?;

    assert!(out.contains("hello --allow-root --quiet --path=/srv/www"));
    assert!(!out.contains("--network"));

    Ok(())
}

#[tokio::test]
async fn network_flag_is_appended_only_when_positive() -> TestResult {
    init_tracing();
    let wp = WpCli::new(&config_for("/bin/echo", 2));

    let out = wp.invoke(vec!["hello".to_string()]).await?;

    assert!(out.contains("--network=2"));

    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_an_error() -> TestResult {
    init_tracing();
    let wp = WpCli::new(&config_for("/bin/false", 0));

    assert!(wp.invoke(vec!["anything".to_string()]).await.is_err());

    Ok(())
}

#[tokio::test]
async fn unspawnable_binary_is_an_error() -> TestResult {
    init_tracing();
    let wp = WpCli::new(&config_for("/no/such/binary", 0));

    assert!(wp.invoke(vec!["anything".to_string()]).await.is_err());

    Ok(())
}

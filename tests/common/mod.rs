use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, Once};
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use cron_runner::errors::Result;
use cron_runner::wp::CliBackend;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing**
///   tests (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.: `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// Classify a subcommand by the upstream operation it performs.
pub fn kind_of(subcommand: &[String]) -> &'static str {
    let has = |want: &str| subcommand.iter().any(|arg| arg == want);

    if subcommand.first().map(String::as_str) == Some("site") {
        "site-list"
    } else if has("get-info") {
        "get-info"
    } else if has("list-due-batch") {
        "list-due-batch"
    } else if has("run") {
        "run"
    } else {
        "other"
    }
}

/// Scripted WP-CLI fake: replays canned output per subcommand kind and
/// records every invocation, never forking a process.
pub struct FakeWpCli {
    responses: Mutex<HashMap<&'static str, Vec<std::result::Result<String, String>>>>,
    invocations: Mutex<Vec<Vec<String>>>,
}

impl FakeWpCli {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response for a subcommand kind. The last queued
    /// response for a kind is sticky and replays forever.
    pub fn respond(&self, kind: &'static str, output: &str) {
        self.responses
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(Ok(output.to_string()));
    }

    /// Queue a failure (spawn error or non-zero exit) for a subcommand kind.
    pub fn fail(&self, kind: &'static str, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(Err(message.to_string()));
    }

    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn invocations_of(&self, kind: &'static str) -> Vec<Vec<String>> {
        self.invocations()
            .into_iter()
            .filter(|subcommand| kind_of(subcommand) == kind)
            .collect()
    }
}

impl CliBackend for FakeWpCli {
    fn invoke(
        &self,
        subcommand: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        self.invocations.lock().unwrap().push(subcommand.clone());

        let kind = kind_of(&subcommand);
        let result = {
            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(kind) {
                Some(queue) if queue.len() > 1 => queue.remove(0),
                Some(queue) if queue.len() == 1 => queue[0].clone(),
                _ => Err(format!("no scripted response for {kind}")),
            }
        };

        Box::pin(async move { result.map_err(|msg| anyhow::anyhow!(msg)) })
    }
}

/// Poll `cond` every 50 ms until it holds or `timeout` elapses.
pub async fn eventually(timeout: Duration, cond: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    cond()
}

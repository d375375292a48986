// src/engine/retrievers.rs

//! Event retrieval: the second pipeline stage.
//!
//! A pool of workers shares the sites receiver; each fetches the due
//! batch for one site at a time, stamps every event with the site URL,
//! and forwards it downstream. The pool provides parallelism across
//! sites, not within one site's batch.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::types::{Event, Site};
use crate::wp::CliBackend;

use super::state::RunnerState;

/// Pause between sites to limit load on the upstream.
const PER_SITE_BREAK: Duration = Duration::from_secs(1);

/// Sites receiver shared by the whole pool; the lock is held only across
/// the `recv` itself.
pub type SharedSiteRx = Arc<Mutex<mpsc::Receiver<Site>>>;

/// Spawn `count` retriever workers sharing one sites receiver.
pub fn spawn_event_retrievers(
    state: &Arc<RunnerState>,
    backend: &Arc<dyn CliBackend>,
    sites_rx: mpsc::Receiver<Site>,
    events_tx: mpsc::Sender<Event>,
    count: usize,
) {
    let sites_rx: SharedSiteRx = Arc::new(Mutex::new(sites_rx));
    for ordinal in 1..=count {
        tokio::spawn(queue_site_events(
            ordinal,
            state.clone(),
            backend.clone(),
            sites_rx.clone(),
            events_tx.clone(),
        ));
    }
}

/// One retriever: pull sites, fetch each site's due batch, stamp the
/// URL, and forward events downstream.
///
/// On shutdown mid-batch the remaining events are dropped — the upstream
/// returns anything unrun on the next fetch.
pub async fn queue_site_events(
    ordinal: usize,
    state: Arc<RunnerState>,
    backend: Arc<dyn CliBackend>,
    sites_rx: SharedSiteRx,
    events_tx: mpsc::Sender<Event>,
) {
    state.set_retriever_live(ordinal, true);
    info!("started retriever {ordinal}");

    'sites: loop {
        let received = { sites_rx.lock().await.recv().await };
        let Some(site) = received else { break };

        if state.is_shutting_down() {
            info!("exiting event retriever {ordinal}");
            break;
        }
        debug!(retriever = ordinal, url = %site.url, "fetching due events");

        match get_site_events(backend.as_ref(), &site.url).await {
            Ok(events) => {
                for mut event in events {
                    if state.is_shutting_down() {
                        break 'sites;
                    }
                    event.url = site.url.clone();
                    if events_tx.send(event).await.is_err() {
                        break 'sites;
                    }
                }
            }
            Err(err) => {
                debug!(retriever = ordinal, url = %site.url, error = %err, "due-batch fetch failed");
            }
        }

        tokio::time::sleep(PER_SITE_BREAK).await;
    }

    state.set_retriever_live(ordinal, false);
}

async fn get_site_events(backend: &dyn CliBackend, site_url: &str) -> Result<Vec<Event>> {
    let raw = backend
        .invoke(vec![
            "cron-control".to_string(),
            "orchestrate".to_string(),
            "runner-only".to_string(),
            "list-due-batch".to_string(),
            format!("--url={site_url}"),
            "--format=json".to_string(),
        ])
        .await?;

    serde_json::from_str(&raw).context("decoding due-batch response")
}

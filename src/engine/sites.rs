// src/engine/sites.rs

//! Site discovery: the first pipeline stage.
//!
//! On each `get-events-interval` epoch the retriever asks the upstream
//! for instance info, consults the back-off governor, enumerates the
//! sites to poll, and feeds them into the bounded sites channel. A full
//! channel blocks the loop — backpressure from a saturated retriever
//! pool is the intended behavior.

use std::sync::Arc;

use anyhow::{Context, Result};
use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::RunnerConfig;
use crate::types::{Site, SiteInfo};
use crate::wp::CliBackend;

use super::backoff::should_get_sites;
use super::epoch::wait_for_epoch;
use super::state::RunnerState;

/// Periodically enumerate sites and feed them to the retriever pool.
///
/// Runs until shutdown. A cycle that fails upstream is skipped; the loop
/// never aborts on its own.
pub async fn retrieve_sites_periodically(
    state: Arc<RunnerState>,
    backend: Arc<dyn CliBackend>,
    cfg: RunnerConfig,
    sites_tx: mpsc::Sender<Site>,
) {
    loop {
        wait_for_epoch(&state, "site-discovery", cfg.get_events_interval).await;
        if state.is_shutting_down() {
            info!("exiting site retriever");
            return;
        }

        let sites = match get_sites(&state, backend.as_ref()).await {
            Ok(sites) => sites,
            Err(err) => {
                debug!(error = %err, "site discovery cycle failed");
                continue;
            }
        };

        for site in sites {
            if sites_tx.send(site).await.is_err() {
                return;
            }
        }
    }
}

/// One discovery cycle: instance info, governor consultation, enumeration.
///
/// Returns an empty list when the governor denies the cycle.
pub async fn get_sites(state: &RunnerState, backend: &dyn CliBackend) -> Result<Vec<Site>> {
    let info = match get_instance_info(backend).await {
        Ok(info) => info,
        Err(err) => {
            // An unreachable or undecodable upstream throttles like a
            // disabled one.
            debug!(error = %err, "get-info failed, treating instance as disabled");
            SiteInfo {
                disabled: 1,
                ..SiteInfo::default()
            }
        }
    };

    if !should_get_sites(state, info.disabled).await {
        return Ok(Vec::new());
    }

    if info.multisite == 1 {
        return get_multisite_sites(backend).await;
    }

    Ok(vec![Site { url: info.siteurl }])
}

async fn get_instance_info(backend: &dyn CliBackend) -> Result<SiteInfo> {
    let raw = backend
        .invoke(subcommand(&[
            "cron-control",
            "orchestrate",
            "runner-only",
            "get-info",
            "--format=json",
        ]))
        .await?;

    let decoded: Vec<SiteInfo> =
        serde_json::from_str(&raw).context("decoding get-info response")?;
    decoded.into_iter().next().context("empty get-info response")
}

async fn get_multisite_sites(backend: &dyn CliBackend) -> Result<Vec<Site>> {
    let raw = backend
        .invoke(subcommand(&[
            "site",
            "list",
            "--fields=url",
            "--archived=false",
            "--deleted=false",
            "--spam=false",
            "--format=json",
        ]))
        .await?;

    let mut sites: Vec<Site> =
        serde_json::from_str(&raw).context("decoding site list response")?;
    shuffle_sites(&mut sites);
    Ok(sites)
}

/// In-place shuffle so queue order favors no site.
pub fn shuffle_sites(sites: &mut [Site]) {
    let mut rng = rand::rng();
    for i in 0..sites.len() {
        let j = rng.random_range(0..=i);
        sites.swap(i, j);
    }
}

fn subcommand(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

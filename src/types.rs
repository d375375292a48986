// src/types.rs

//! Wire-contract data model shared across the pipeline stages.
//!
//! Everything here mirrors the JSON produced by the external tool. The
//! upstream emits PascalCase keys from some commands and lowercase from
//! others, so each field accepts both spellings.

use serde::Deserialize;

/// Instance description returned by `get-info`.
///
/// `disabled` is `0` when automation is enabled, `1` when disabled
/// indefinitely; any larger value is the unix timestamp the disable
/// expires at.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteInfo {
    #[serde(default, alias = "Multisite")]
    pub multisite: i64,
    #[serde(default, alias = "Siteurl")]
    pub siteurl: String,
    #[serde(default, alias = "Disabled")]
    pub disabled: i64,
}

/// One tenant, identified by URL.
///
/// The `Default` value (empty URL) doubles as the drain sentinel pushed
/// to wake channel-blocked retrievers during shutdown.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Site {
    #[serde(default, alias = "URL")]
    pub url: String,
}

/// One due job occurrence for a site.
///
/// `action` and `instance` are opaque to the runner and passed to the
/// external tool verbatim. `url` is not part of the wire format; the
/// event retriever stamps it after fetching a site's batch. As with
/// [`Site`], the `Default` value is the drain sentinel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    #[serde(default, alias = "URL")]
    pub url: String,
    #[serde(default, alias = "Timestamp")]
    pub timestamp: i64,
    #[serde(default, alias = "Action")]
    pub action: String,
    #[serde(default, alias = "Instance")]
    pub instance: String,
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{defaults, sync};
use crate::types::ResourceKind;
use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Cache configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Resource kinds to cache, in the order their stores are synced
    pub kinds: Vec<ResourceKind>,
    pub listen_addr: SocketAddr,
    /// Interval between full re-lists of every kind
    pub resync_interval: Duration,
    /// Upper bound on the wait for each kind's first listing
    pub sync_timeout: Duration,
    /// Interval between republished JSON snapshots; `None` publishes only at startup
    pub snapshot_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            kinds: vec![ResourceKind::Namespaces, ResourceKind::Ingresses],
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8090)),
            resync_interval: Duration::from_secs(sync::RESYNC_INTERVAL_SECS),
            sync_timeout: Duration::from_secs(sync::SYNC_TIMEOUT_SECS),
            snapshot_interval: Some(Duration::from_secs(sync::SNAPSHOT_INTERVAL_SECS)),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kinds = lookup("CACHE_KINDS").unwrap_or_else(|| defaults::CACHE_KINDS.to_string());
        let kinds = parse_kinds(&kinds).context("CACHE_KINDS is invalid")?;

        let listen_addr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| defaults::LISTEN_ADDR.to_string())
            .parse()
            .context("LISTEN_ADDR is not a valid socket address")?;

        let resync_interval = secs(&lookup, "RESYNC_INTERVAL_SECS", sync::RESYNC_INTERVAL_SECS)?;
        let sync_timeout = secs(&lookup, "SYNC_TIMEOUT_SECS", sync::SYNC_TIMEOUT_SECS)?;
        if resync_interval.is_zero() {
            anyhow::bail!("RESYNC_INTERVAL_SECS must be greater than zero");
        }

        // zero turns off periodic republishing
        let snapshot_interval =
            Some(secs(&lookup, "SNAPSHOT_INTERVAL_SECS", sync::SNAPSHOT_INTERVAL_SECS)?)
                .filter(|d| !d.is_zero());

        Ok(Config {
            kinds,
            listen_addr,
            resync_interval,
            sync_timeout,
            snapshot_interval,
        })
    }
}

fn secs<F>(lookup: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a whole number of seconds, got '{}'", key, raw))?,
        None => default,
    };
    Ok(Duration::from_secs(value))
}

/// Parse a comma-separated list of kinds, dropping duplicates
fn parse_kinds(raw: &str) -> Result<Vec<ResourceKind>> {
    let mut kinds = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind: ResourceKind = name.parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        anyhow::bail!("no resource kinds configured");
    }
    Ok(kinds)
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Serialized JSON snapshots of every store, republished on an interval so
//! unfiltered reads can share one buffer.

use crate::cache::CacheInner;
use crate::types::ResourceKind;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

pub(crate) struct Snapshots {
    published: HashMap<ResourceKind, watch::Sender<Option<Arc<str>>>>,
}

impl Snapshots {
    pub(crate) fn new(kinds: &[ResourceKind]) -> Self {
        let published = kinds
            .iter()
            .map(|&kind| (kind, watch::Sender::new(None)))
            .collect();
        Self { published }
    }

    /// Last published JSON for `kind`, if any
    pub(crate) fn get(&self, kind: ResourceKind) -> Option<Arc<str>> {
        self.published.get(&kind)?.borrow().clone()
    }

    pub(crate) fn publish(&self, kind: ResourceKind, json: String) {
        if let Some(tx) = self.published.get(&kind) {
            tx.send_replace(Some(Arc::from(json)));
        }
    }
}

/// Republish every `period` until the cache is dropped
pub(crate) fn spawn_publisher(cache: Weak<CacheInner>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick fires at once; construction already published
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let Some(cache) = cache.upgrade() else {
                debug!("Cache dropped, stopping snapshot publisher");
                return;
            };
            debug!("Refresh JSON outputs");
            cache.refresh_snapshots();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpublished_kind_has_no_snapshot() {
        let snapshots = Snapshots::new(&[ResourceKind::Pods]);
        assert!(snapshots.get(ResourceKind::Pods).is_none());
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let snapshots = Snapshots::new(&[ResourceKind::Pods]);

        snapshots.publish(ResourceKind::Pods, "[]".to_string());
        let first = snapshots.get(ResourceKind::Pods).unwrap();
        snapshots.publish(ResourceKind::Pods, "[{}]".to_string());

        assert_eq!(&*first, "[]");
        assert_eq!(&*snapshots.get(ResourceKind::Pods).unwrap(), "[{}]");
    }

    #[test]
    fn test_publish_ignores_unknown_kind() {
        let snapshots = Snapshots::new(&[ResourceKind::Pods]);
        snapshots.publish(ResourceKind::Ingresses, "[]".to_string());
        assert!(snapshots.get(ResourceKind::Ingresses).is_none());
    }
}

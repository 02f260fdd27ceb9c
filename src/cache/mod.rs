// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Local cache of cluster resources, one synchronized store per kind.

pub mod snapshot;

use crate::cache::snapshot::{spawn_publisher, Snapshots};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::query::matches_selectors;
use crate::sync::{start_synchronizer, KindStore};
use crate::types::{ResourceKind, Selector};
use kube::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, instrument, trace};

/// Cache of cluster resources answering queries without calling the API server.
///
/// The set of kinds is fixed at construction. Each kind is kept up to date by
/// its own synchronizer task; clones share the same stores.
#[derive(Clone)]
pub struct ResourceCache {
    inner: Arc<CacheInner>,
}

pub(crate) struct CacheInner {
    kinds: Vec<ResourceKind>,
    stores: HashMap<ResourceKind, Box<dyn KindStore>>,
    snapshots: Snapshots,
    /// Periodic snapshot task; without one unfiltered reads serialize the live store
    publisher: Option<AbortHandle>,
}

impl ResourceCache {
    /// Synchronize every kind from the cluster, one kind at a time.
    ///
    /// Each kind gets at most `config.sync_timeout` to complete its first
    /// listing. A kind that does not make it is logged and stays registered,
    /// and reads on it fail with [`CacheError::NotSynced`] until it syncs.
    #[instrument(skip(client, config))]
    pub async fn new(client: Client, kinds: &[ResourceKind], config: &Config) -> Self {
        let mut stores: Vec<Box<dyn KindStore>> = Vec::with_capacity(kinds.len());

        for &kind in kinds {
            if stores.iter().any(|s| s.kind() == kind) {
                debug!("Skipping duplicate kind {}", kind);
                continue;
            }
            let store = start_synchronizer(&client, kind, config.resync_interval);
            wait_for_store(store.as_ref(), config.sync_timeout).await;
            stores.push(store);
        }

        Self::assemble(stores, config.snapshot_interval)
    }

    /// Build a cache over already started stores, waiting for each in order
    pub async fn with_stores(stores: Vec<Box<dyn KindStore>>, config: &Config) -> Self {
        let mut unique: Vec<Box<dyn KindStore>> = Vec::with_capacity(stores.len());
        for store in stores {
            if unique.iter().any(|s| s.kind() == store.kind()) {
                debug!("Skipping duplicate kind {}", store.kind());
                continue;
            }
            wait_for_store(store.as_ref(), config.sync_timeout).await;
            unique.push(store);
        }

        Self::assemble(unique, config.snapshot_interval)
    }

    fn assemble(stores: Vec<Box<dyn KindStore>>, snapshot_interval: Option<Duration>) -> Self {
        let kinds: Vec<ResourceKind> = stores.iter().map(|s| s.kind()).collect();
        let snapshots = Snapshots::new(&kinds);
        let stores = stores.into_iter().map(|s| (s.kind(), s)).collect();
        let inner = Arc::new_cyclic(|cache| CacheInner {
            kinds,
            stores,
            snapshots,
            publisher: snapshot_interval
                .map(|period| spawn_publisher(cache.clone(), period).abort_handle()),
        });

        if inner.publisher.is_some() {
            inner.refresh_snapshots();
        }

        info!("Resource cache ready for {:?}", inner.kinds);
        Self { inner }
    }

    /// Configured kinds in construction order
    pub fn kinds(&self) -> &[ResourceKind] {
        &self.inner.kinds
    }

    /// Whether `kind` is configured and has completed its first listing
    pub fn is_synced(&self, kind: ResourceKind) -> bool {
        self.inner
            .stores
            .get(&kind)
            .is_some_and(|store| store.has_synced())
    }

    /// Current objects of `kind`, in no particular order
    pub fn get_all(&self, kind: ResourceKind) -> Result<Vec<Value>> {
        self.inner.store(kind)?.snapshot()
    }

    /// Objects of `kind` matching all `selectors`.
    ///
    /// Works on a single snapshot of the store. The first selector error
    /// aborts the whole call.
    pub fn get_filtered(&self, kind: ResourceKind, selectors: &[Selector]) -> Result<Vec<Value>> {
        let objects = self.get_all(kind)?;

        let mut filtered = Vec::new();
        for (i, obj) in objects.into_iter().enumerate() {
            trace!("Checking {} #{}", kind, i);
            if matches_selectors(&obj, selectors)? {
                filtered.push(obj);
            }
        }

        debug!("{} of {} matched {:?}", filtered.len(), kind, selectors);
        Ok(filtered)
    }

    /// JSON array of every object of `kind`.
    ///
    /// With a snapshot publisher this is the most recently published snapshot;
    /// otherwise the live store is serialized on every call.
    pub fn json_output(&self, kind: ResourceKind) -> Result<Arc<str>> {
        let store = self.inner.store(kind)?;

        if self.inner.publisher.is_none() {
            return Ok(Arc::from(store.to_json()?));
        }

        if let Some(json) = self.inner.snapshots.get(kind) {
            return Ok(json);
        }

        // synced after the last publish
        self.inner.snapshots.publish(kind, store.to_json()?);
        self.inner
            .snapshots
            .get(kind)
            .ok_or(CacheError::NotSynced(kind))
    }

    /// Serialize every synced store and republish it
    pub fn refresh_snapshots(&self) {
        self.inner.refresh_snapshots();
    }

    /// Stop all synchronizers and the snapshot publisher
    pub fn shutdown(&self) {
        info!("Shutting down resource cache");
        self.inner.shutdown();
    }
}

impl CacheInner {
    fn store(&self, kind: ResourceKind) -> Result<&dyn KindStore> {
        let store = self
            .stores
            .get(&kind)
            .ok_or(CacheError::KindNotConfigured(kind))?;
        if !store.has_synced() {
            return Err(CacheError::NotSynced(kind));
        }
        Ok(store.as_ref())
    }

    pub(crate) fn refresh_snapshots(&self) {
        for kind in &self.kinds {
            let Ok(store) = self.store(*kind) else {
                continue;
            };
            match store.to_json() {
                Ok(json) => self.snapshots.publish(*kind, json),
                Err(e) => error!("Failed to publish {} snapshot: {}", kind, e),
            }
        }
    }

    fn shutdown(&self) {
        for store in self.stores.values() {
            store.shutdown();
        }
        if let Some(publisher) = &self.publisher {
            publisher.abort();
        }
    }
}

impl Drop for CacheInner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn wait_for_store(store: &dyn KindStore, timeout: Duration) {
    match store.wait_for_sync(timeout).await {
        Ok(()) => info!("{} store synced", store.kind()),
        Err(e) => error!("{}", e),
    }
}

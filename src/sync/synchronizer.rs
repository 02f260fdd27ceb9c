// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-kind synchronizer keeping a local store in line with the cluster.

use crate::constants::sync::RESTART_PAUSE_MILLIS;
use crate::error::{CacheError, Result};
use crate::sync::source::EventSource;
use crate::types::ResourceKind;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use kube::Resource;
use kube_runtime::reflector::{self, Store};
use kube_runtime::watcher::Event;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument, warn};

/// Type-erased view of one kind's synchronized store
pub trait KindStore: Send + Sync {
    fn kind(&self) -> ResourceKind;

    /// Whether the first full listing has been applied
    fn has_synced(&self) -> bool;

    /// Resolve once the first full listing has been applied
    fn wait_for_sync(&self, timeout: Duration) -> BoxFuture<'_, Result<()>>;

    /// Current objects in serialized form, in no particular order
    fn snapshot(&self) -> Result<Vec<Value>>;

    /// Current objects as a JSON array
    fn to_json(&self) -> Result<String>;

    /// Stop updating the store
    fn shutdown(&self);
}

/// Maintains a reflector store for one kind from an [`EventSource`].
///
/// The background task applies watch events as they arrive and re-opens the
/// source every resync interval. A re-opened source lists everything again and
/// the store is swapped in one step once that listing is complete, so a resync
/// always wins over watch events from the previous stream.
pub struct Synchronizer<K>
where
    K: Resource<DynamicType = ()> + Clone + 'static,
{
    kind: ResourceKind,
    store: Store<K>,
    synced: watch::Receiver<bool>,
    task: JoinHandle<()>,
}

impl<K> Synchronizer<K>
where
    K: Resource<DynamicType = ()> + Clone + Send + Sync + 'static,
{
    /// Start synchronizing in the background
    pub fn start<S>(kind: ResourceKind, source: S, resync_interval: Duration) -> Self
    where
        S: EventSource<K>,
    {
        let (store, writer) = reflector::store::<K>();
        let (synced_tx, synced) = watch::channel(false);
        let task = tokio::spawn(run(kind, source, writer, synced_tx, resync_interval));

        Self {
            kind,
            store,
            synced,
            task,
        }
    }

    pub fn has_synced(&self) -> bool {
        *self.synced.borrow()
    }

    pub async fn wait_for_sync(&self, timeout: Duration) -> Result<()> {
        let mut synced = self.synced.clone();
        let wait = async move { synced.wait_for(|done| *done).await.map(|_| ()) };

        match tokio::time::timeout(timeout, wait).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(CacheError::SyncAborted(self.kind)),
            Err(_) => Err(CacheError::SyncTimeout(self.kind)),
        }
    }

    /// Current objects, in no particular order
    pub fn list(&self) -> Vec<Arc<K>> {
        self.store.state()
    }

    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl<K> Drop for Synchronizer<K>
where
    K: Resource<DynamicType = ()> + Clone + 'static,
{
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<K> KindStore for Synchronizer<K>
where
    K: Resource<DynamicType = ()> + Clone + Serialize + Send + Sync + 'static,
{
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn has_synced(&self) -> bool {
        Synchronizer::has_synced(self)
    }

    fn wait_for_sync(&self, timeout: Duration) -> BoxFuture<'_, Result<()>> {
        Synchronizer::wait_for_sync(self, timeout).boxed()
    }

    fn snapshot(&self) -> Result<Vec<Value>> {
        self.list()
            .iter()
            .map(|obj| serde_json::to_value(obj.as_ref()).map_err(CacheError::from))
            .collect()
    }

    fn to_json(&self) -> Result<String> {
        let state = self.list();
        let objects: Vec<&K> = state.iter().map(Arc::as_ref).collect();
        Ok(serde_json::to_string(&objects)?)
    }

    fn shutdown(&self) {
        Synchronizer::shutdown(self)
    }
}

#[instrument(skip(source, writer, synced, resync_interval))]
async fn run<K, S>(
    kind: ResourceKind,
    source: S,
    mut writer: reflector::store::Writer<K>,
    synced: watch::Sender<bool>,
    resync_interval: Duration,
) where
    K: Resource<DynamicType = ()> + Clone + Send + Sync + 'static,
    S: EventSource<K>,
{
    loop {
        debug!("Listing {}", kind);
        let mut events = source.open();

        // armed once the current stream has delivered its full listing
        let resync = sleep(resync_interval);
        tokio::pin!(resync);
        let mut listed = false;

        loop {
            tokio::select! {
                _ = &mut resync, if listed => {
                    debug!("Resyncing {}", kind);
                    break;
                }
                event = events.next() => match event {
                    Some(Ok(event)) => {
                        writer.apply_watcher_event(&event);
                        if matches!(event, Event::InitDone) {
                            listed = true;
                            resync.as_mut().reset(Instant::now() + resync_interval);
                            let first = synced.send_if_modified(|done| !std::mem::replace(done, true));
                            if first {
                                info!("Initial listing of {} complete", kind);
                            }
                        }
                    }
                    Some(Err(e)) => warn!("Failed to list or watch {}: {}", kind, e),
                    None => {
                        warn!("Watch stream for {} ended, listing again", kind);
                        sleep(Duration::from_millis(RESTART_PAUSE_MILLIS)).await;
                        break;
                    }
                }
            }
        }
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! List/watch event sources feeding the synchronizers.

use futures::stream::BoxStream;
use futures::StreamExt;
use kube::{Api, Client, Resource};
use kube_runtime::watcher::{self, watcher, Event};
use kube_runtime::WatchStreamExt;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

pub type EventStream<K> = BoxStream<'static, Result<Event<K>, watcher::Error>>;

/// Capability to list and watch one kind of resource.
///
/// Every stream returned by `open` must start with a complete listing
/// (`Init`, `InitApply`..., `InitDone`) before delivering live changes.
pub trait EventSource<K>: Send + Sync + 'static {
    fn open(&self) -> EventStream<K>;
}

/// Cluster-wide list/watch through the Kubernetes API
pub struct ApiSource<K> {
    api: Api<K>,
    config: watcher::Config,
}

impl<K> ApiSource<K>
where
    K: Resource,
    K::DynamicType: Default,
{
    /// Watch the kind across all namespaces
    pub fn all(client: Client) -> Self {
        Self {
            api: Api::all(client),
            config: watcher::Config::default(),
        }
    }
}

impl<K> EventSource<K> for ApiSource<K>
where
    K: Resource + Clone + DeserializeOwned + Debug + Send + Sync + 'static,
{
    fn open(&self) -> EventStream<K> {
        watcher(self.api.clone(), self.config.clone())
            .default_backoff()
            .boxed()
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Background synchronization of cluster resources into local stores.

pub mod source;
pub mod synchronizer;

pub use source::{ApiSource, EventSource, EventStream};
pub use synchronizer::{KindStore, Synchronizer};

use crate::types::ResourceKind;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use k8s_openapi::api::networking::v1::{Ingress, NetworkPolicy};
use kube::Client;
use std::time::Duration;

/// Start a cluster-wide synchronizer for `kind`
pub fn start_synchronizer(
    client: &Client,
    kind: ResourceKind,
    resync_interval: Duration,
) -> Box<dyn KindStore> {
    match kind {
        ResourceKind::Namespaces => Box::new(Synchronizer::<Namespace>::start(
            kind,
            ApiSource::<Namespace>::all(client.clone()),
            resync_interval,
        )),
        ResourceKind::Pods => Box::new(Synchronizer::<Pod>::start(
            kind,
            ApiSource::<Pod>::all(client.clone()),
            resync_interval,
        )),
        ResourceKind::Ingresses => Box::new(Synchronizer::<Ingress>::start(
            kind,
            ApiSource::<Ingress>::all(client.clone()),
            resync_interval,
        )),
        ResourceKind::NetworkPolicies => Box::new(Synchronizer::<NetworkPolicy>::start(
            kind,
            ApiSource::<NetworkPolicy>::all(client.clone()),
            resync_interval,
        )),
    }
}

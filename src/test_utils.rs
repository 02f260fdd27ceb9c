// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking the Kubernetes API and cached stores.

use crate::error::{CacheError, Result};
use crate::sync::KindStore;
use crate::types::ResourceKind;
use futures::future::BoxFuture;
use futures::FutureExt;
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a response for GET requests matching the exact path, query ignored
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(("GET".to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let response = self.find_response(&method, &path);

        Box::pin(async move {
            let (status, body) = response.unwrap_or_else(|| {
                (
                    404,
                    r#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"not found","reason":"NotFound","code":404}"#
                        .to_string(),
                )
            });
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// In-memory store of serialized objects, editable through [`StaticStore::objects`]
pub struct StaticStore {
    kind: ResourceKind,
    objects: Arc<Mutex<Vec<Value>>>,
    synced: bool,
}

impl StaticStore {
    pub fn synced(kind: ResourceKind, objects: Vec<Value>) -> Self {
        Self {
            kind,
            objects: Arc::new(Mutex::new(objects)),
            synced: true,
        }
    }

    /// A store whose first listing never completes
    pub fn unsynced(kind: ResourceKind) -> Self {
        Self {
            kind,
            objects: Arc::default(),
            synced: false,
        }
    }

    /// Shared handle to the stored objects, usable after the store is boxed
    pub fn objects(&self) -> Arc<Mutex<Vec<Value>>> {
        self.objects.clone()
    }
}

impl KindStore for StaticStore {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn has_synced(&self) -> bool {
        self.synced
    }

    fn wait_for_sync(&self, _timeout: Duration) -> BoxFuture<'_, Result<()>> {
        let result = if self.synced {
            Ok(())
        } else {
            Err(CacheError::SyncTimeout(self.kind))
        };
        async move { result }.boxed()
    }

    fn snapshot(&self) -> Result<Vec<Value>> {
        Ok(self.objects.lock().unwrap().clone())
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.objects.lock().unwrap())?)
    }

    fn shutdown(&self) {}
}

/// A namespace as returned by the API server
pub fn namespace_json(name: &str) -> Value {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": format!("uid-{}", name),
            "resourceVersion": "1"
        }
    })
}

/// A pod in `namespace` carrying `labels`
pub fn pod_json(name: &str, namespace: &str, labels: &[(&str, &str)]) -> Value {
    let labels: serde_json::Map<String, Value> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect();

    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "labels": labels
        },
        "spec": {
            "nodeName": "node-1",
            "containers": [{ "name": "main", "image": "nginx" }]
        }
    })
}

/// A list response wrapping `items`
pub fn object_list_json(list_kind: &str, items: Vec<Value>) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": list_kind,
        "metadata": { "resourceVersion": "1" },
        "items": items
    })
    .to_string()
}

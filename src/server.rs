// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface: `GET /<kind>` with optional selector query parameters.

use crate::cache::ResourceCache;
use crate::error::CacheError;
use crate::query::{parse_query_params, query_params};
use crate::types::ResourceKind;
use anyhow::Context;
use bytes::Bytes;
use http::{header, HeaderValue, Method, Request, Response, StatusCode, Uri};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Serve the cache over HTTP/1.1 until the listener fails
pub async fn serve(cache: ResourceCache, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving {:?} on {}", cache.kinds(), addr);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                continue;
            }
        };

        let cache = cache.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let response = handle(&cache, &req);
                async move { Ok::<_, Infallible>(response) }
            });

            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!("Connection from {} ended with error: {}", peer, e);
            }
        });
    }
}

/// Answer one request
pub fn handle<B>(cache: &ResourceCache, req: &Request<B>) -> Response<Full<Bytes>> {
    if req.method() != Method::GET {
        return text(StatusCode::METHOD_NOT_ALLOWED, "only GET is supported");
    }
    respond(cache, req.uri())
}

/// Route `uri` to its kind and run the query it carries.
///
/// Without selectors the published snapshot is returned as is; with
/// selectors the live store is filtered.
pub fn respond(cache: &ResourceCache, uri: &Uri) -> Response<Full<Bytes>> {
    let Some(kind) = route(uri.path()) else {
        return text(StatusCode::NOT_FOUND, "not found");
    };

    let selectors = parse_query_params(&query_params(uri.query().unwrap_or_default()));

    let body = if selectors.is_empty() {
        cache
            .json_output(kind)
            .map(|json| Bytes::copy_from_slice(json.as_bytes()))
    } else {
        cache
            .get_filtered(kind, &selectors)
            .and_then(|objects| Ok(Bytes::from(serde_json::to_vec(&objects)?)))
    };

    match body {
        Ok(body) => with_type(StatusCode::OK, "application/json", body),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                warn!("Failed to answer {}: {}", uri, e);
            } else {
                debug!("Rejected {}: {}", uri, e);
            }
            text(status, &e.to_string())
        }
    }
}

fn route(path: &str) -> Option<ResourceKind> {
    path.strip_prefix('/')?.parse().ok()
}

fn status_for(error: &CacheError) -> StatusCode {
    match error {
        CacheError::MalformedConstraint(_) | CacheError::UnknownSelectorKind(_) => {
            StatusCode::BAD_REQUEST
        }
        CacheError::KindNotConfigured(_) | CacheError::UnknownKind(_) => StatusCode::NOT_FOUND,
        CacheError::NotSynced(_) | CacheError::SyncTimeout(_) | CacheError::SyncAborted(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn text(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    with_type(
        status,
        "text/plain; charset=utf-8",
        Bytes::copy_from_slice(message.as_bytes()),
    )
}

fn with_type(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_utils::{pod_json, StaticStore};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::time::Duration;

    async fn cache() -> ResourceCache {
        let pods = StaticStore::synced(
            ResourceKind::Pods,
            vec![
                pod_json("web-0", "default", &[("app", "x")]),
                pod_json("db-0", "data", &[("app", "db")]),
            ],
        );
        let ingresses = StaticStore::unsynced(ResourceKind::Ingresses);
        let config = Config {
            sync_timeout: Duration::from_millis(50),
            snapshot_interval: None,
            ..Config::default()
        };
        ResourceCache::with_stores(vec![Box::new(pods), Box::new(ingresses)], &config).await
    }

    async fn get(cache: &ResourceCache, uri: &str) -> (StatusCode, Bytes) {
        let response = respond(cache, &uri.parse().unwrap());
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    #[tokio::test]
    async fn test_no_selectors_returns_every_object() {
        let cache = cache().await;
        let (status, body) = get(&cache, "/pods").await;

        assert_eq!(status, StatusCode::OK);
        let objects: Vec<Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(objects.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_selector_values_are_ignored() {
        let cache = cache().await;
        let (status, body) = get(&cache, "/pods?labelSelector=").await;

        assert_eq!(status, StatusCode::OK);
        let objects: Vec<Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(objects.len(), 2);
    }

    #[tokio::test]
    async fn test_selectors_filter_objects() {
        let cache = cache().await;
        let (status, body) = get(&cache, "/pods?labelSelector=app%3Dx&namespace=default").await;

        assert_eq!(status, StatusCode::OK);
        let objects: Vec<Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["metadata"]["name"], "web-0");
    }

    #[tokio::test]
    async fn test_malformed_selector_is_bad_request() {
        let cache = cache().await;
        let (status, body) = get(&cache, "/pods?labelSelector=appx").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(&body[..], b"Key and value are not matched correctly: appx");
    }

    #[tokio::test]
    async fn test_unknown_selector_kind_is_bad_request() {
        let cache = cache().await;
        let (status, _) = get(&cache, "/pods?annotationSelector=a%3Db").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unconfigured_and_unknown_kinds_are_not_found() {
        let cache = cache().await;

        assert_eq!(get(&cache, "/networkpolicies").await.0, StatusCode::NOT_FOUND);
        assert_eq!(get(&cache, "/deployments").await.0, StatusCode::NOT_FOUND);
        assert_eq!(get(&cache, "/").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unsynced_kind_is_unavailable() {
        let cache = cache().await;
        assert_eq!(
            get(&cache, "/ingresses").await.0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_only_get_is_allowed() {
        let cache = cache().await;
        let req = Request::post("/pods").body(()).unwrap();

        assert_eq!(
            handle(&cache, &req).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use kube::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kubecache::cache::ResourceCache;
use kubecache::config::Config;
use kubecache::server::serve;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting kubecache");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: kinds={:?}, listen_addr={}",
        config.kinds, config.listen_addr
    );

    // Create Kubernetes client
    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    info!("Connected to Kubernetes cluster");

    // Blocks until every kind has listed once or timed out
    let cache = ResourceCache::new(client, &config.kinds, &config).await;
    info!("Resource cache created");

    tokio::select! {
        res = serve(cache.clone(), config.listen_addr) => res?,
        _ = tokio::signal::ctrl_c() => info!("Received interrupt, shutting down"),
    }

    cache.shutdown();
    Ok(())
}

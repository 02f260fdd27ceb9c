// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::ResourceKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),

    #[error("Resource kind {0} is not cached")]
    KindNotConfigured(ResourceKind),

    #[error("Resource kind {0} has not completed its initial sync")]
    NotSynced(ResourceKind),

    #[error("Timed out waiting for {0} cache to sync")]
    SyncTimeout(ResourceKind),

    #[error("Synchronizer for {0} stopped before its initial sync")]
    SyncAborted(ResourceKind),

    #[error("Key and value are not matched correctly: {0}")]
    MalformedConstraint(String),

    #[error("{0} is not a valid selector kind")]
    UnknownSelectorKind(String),

    #[error("Failed to serialize cached objects: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// Whether the error was caused by the query itself rather than the cache state
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            CacheError::MalformedConstraint(_) | CacheError::UnknownSelectorKind(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

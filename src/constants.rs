// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Selector kind names accepted as query parameters
pub mod selectors {
    pub const LABEL: &str = "labelSelector";
    pub const FIELD: &str = "fieldSelector";
    pub const NAMESPACE: &str = "namespace";
}

/// Serialized paths inside every cached object
pub mod paths {
    pub const LABELS: [&str; 2] = ["metadata", "labels"];
    pub const NAMESPACE: [&str; 2] = ["metadata", "namespace"];
}

/// Synchronization and publishing defaults
pub mod sync {
    /// Full re-list interval in seconds
    pub const RESYNC_INTERVAL_SECS: u64 = 30;
    /// Upper bound on the wait for a kind's first full listing
    pub const SYNC_TIMEOUT_SECS: u64 = 300;
    /// Interval between republished JSON snapshots
    pub const SNAPSHOT_INTERVAL_SECS: u64 = 30;
    /// Pause before re-opening a watch stream that ended on its own
    pub const RESTART_PAUSE_MILLIS: u64 = 1000;
}

/// Defaults for the process configuration
pub mod defaults {
    pub const CACHE_KINDS: &str = "namespaces,ingresses";
    pub const LISTEN_ADDR: &str = "0.0.0.0:8090";
}

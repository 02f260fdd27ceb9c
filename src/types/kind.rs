// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::CacheError;
use std::fmt;
use std::str::FromStr;

/// Kinds of cluster resources the cache knows how to synchronize.
///
/// The string form is the plural resource name used on the command line and
/// as the HTTP route, e.g. `networkpolicies`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Namespaces,
    Pods,
    Ingresses,
    NetworkPolicies,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Namespaces,
        ResourceKind::Pods,
        ResourceKind::Ingresses,
        ResourceKind::NetworkPolicies,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Namespaces => "namespaces",
            ResourceKind::Pods => "pods",
            ResourceKind::Ingresses => "ingresses",
            ResourceKind::NetworkPolicies => "networkpolicies",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CacheError::UnknownKind(s.to_string()))
    }
}

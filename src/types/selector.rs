// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::selectors;
use crate::error::CacheError;
use std::str::FromStr;

/// A named filter expression taken from a query.
///
/// `kind` stays free text so an unknown kind is only rejected when the
/// selector is evaluated. `contents` holds comma-separated constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub kind: String,
    pub contents: String,
}

impl Selector {
    pub fn new(kind: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            contents: contents.into(),
        }
    }

    /// The individual constraints, split on `,` without any normalization
    pub fn constraints(&self) -> impl Iterator<Item = &str> {
        self.contents.split(',')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    /// `key=value` matched against `metadata.labels`
    Label,
    /// `dot.path=value` matched against the serialized object
    Field,
    /// bare value matched against `metadata.namespace`
    Namespace,
}

impl FromStr for SelectorKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            selectors::LABEL => Ok(SelectorKind::Label),
            selectors::FIELD => Ok(SelectorKind::Field),
            selectors::NAMESPACE => Ok(SelectorKind::Namespace),
            other => Err(CacheError::UnknownSelectorKind(other.to_string())),
        }
    }
}

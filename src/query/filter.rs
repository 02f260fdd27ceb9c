// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Selector evaluation over serialized objects.
//!
//! Objects are matched through their JSON form, so field paths use the
//! public API names (`metadata.creationTimestamp`, `spec.nodeName`) and the
//! same code works for every kind.

use crate::constants::paths;
use crate::error::{CacheError, Result};
use crate::types::{Selector, SelectorKind};
use serde_json::Value;
use std::borrow::Cow;
use tracing::trace;

/// Check whether `obj` satisfies every constraint of every selector.
///
/// Evaluation stops at the first constraint that does not match. A malformed
/// constraint or an unknown selector kind is an error for the whole call.
pub fn matches_selectors(obj: &Value, selectors: &[Selector]) -> Result<bool> {
    for selector in selectors {
        let kind: SelectorKind = selector.kind.parse()?;

        for constraint in selector.constraints() {
            let matches = match kind {
                SelectorKind::Label => {
                    let (key, value) = split_pair(constraint)?;
                    label_matches(obj, key, value)
                }
                SelectorKind::Field => {
                    let (path, value) = split_pair(constraint)?;
                    field_matches(obj, path.split('.'), value)
                }
                SelectorKind::Namespace => field_matches(obj, paths::NAMESPACE, constraint),
            };

            if !matches {
                trace!("Constraint '{}' of {} did not match", constraint, selector.kind);
                return Ok(false);
            }
        }
    }

    Ok(true)
}

/// Split a `key=value` constraint; anything but exactly one `=` is malformed
fn split_pair(constraint: &str) -> Result<(&str, &str)> {
    let mut parts = constraint.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => Ok((key, value)),
        _ => Err(CacheError::MalformedConstraint(constraint.to_string())),
    }
}

fn label_matches(obj: &Value, key: &str, value: &str) -> bool {
    match lookup(obj, paths::LABELS) {
        Some(Value::Object(labels)) => labels
            .get(key)
            .and_then(Value::as_str)
            .is_some_and(|actual| actual == value),
        Some(other) => {
            trace!("Labels are not a map of strings: {}", other);
            false
        }
        None => false,
    }
}

fn field_matches<'a, I>(obj: &Value, path: I, value: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let Some(leaf) = lookup(obj, path) else {
        return false;
    };

    match render(leaf) {
        Some(actual) => {
            trace!("Actual is '{}', looking for '{}'", actual, value);
            actual == value
        }
        None => false,
    }
}

/// Follow `path` through nested objects by serialized field name
fn lookup<'v, 'a, I>(obj: &'v Value, path: I) -> Option<&'v Value>
where
    I: IntoIterator<Item = &'a str>,
{
    path.into_iter()
        .try_fold(obj, |current, segment| current.as_object()?.get(segment))
}

/// Render a scalar leaf the way it appears in the API; composite and null leaves have no rendering
fn render(leaf: &Value) -> Option<Cow<'_, str>> {
    match leaf {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

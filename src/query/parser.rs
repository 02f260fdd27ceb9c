// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::Selector;
use std::collections::BTreeMap;

/// Query parameters grouped by name, values kept in arrival order
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// Decode a raw URL query string into grouped parameters
pub fn query_params(query: &str) -> QueryParams {
    let mut params = QueryParams::new();
    for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(name.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    params
}

/// Convert query parameters into selectors.
///
/// The parameter name becomes the selector kind and every non-empty value one
/// selector, so repeated parameters give several selectors of the same kind.
/// Nothing is validated here.
pub fn parse_query_params(params: &QueryParams) -> Vec<Selector> {
    params
        .iter()
        .flat_map(|(kind, values)| {
            values
                .iter()
                .filter(|value| !value.is_empty())
                .map(move |value| Selector::new(kind.as_str(), value.as_str()))
        })
        .collect()
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Query parameter parsing and selector evaluation.

pub mod filter;
pub mod parser;

pub use filter::matches_selectors;
pub use parser::{parse_query_params, query_params, QueryParams};

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource kinds and query selectors.

pub mod kind;
pub mod selector;

pub use kind::ResourceKind;
pub use selector::{Selector, SelectorKind};

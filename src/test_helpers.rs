//! Shared test utilities for the prompt-shell test suite.
//!
//! Provides record builders with fixed timestamps (tests never depend on
//! the clock) and chain-shape assertions for resolution results.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let table = RouteTable::build(default_routes()).unwrap();
//! let chain = resolve(&table, "/history").unwrap();
//! assert_chain(&table, &chain, &["home", "history"]);
//! ```

use chrono::NaiveDateTime;

use crate::catalog::{PromptKind, PromptRecord, created_at_format};
use crate::router::MatchedChain;
use crate::routes::RouteTable;

// =========================================================================
// Record builders
// =========================================================================

/// Parse a timestamp in the catalog's wire format. Panics on bad input.
pub fn stamp(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, created_at_format::FORMAT)
        .unwrap_or_else(|e| panic!("bad test timestamp {raw:?}: {e}"))
}

/// A minimal custom record derived from its id, with a fixed timestamp.
pub fn record(id: &str) -> PromptRecord {
    PromptRecord::custom(
        id,
        &format!("Template {id}"),
        &format!("Content of template {id}"),
        "Testing",
        stamp("2024-06-01 10:00:00"),
    )
}

/// A record with the display-relevant fields spelled out.
pub fn record_full(
    id: &str,
    title: &str,
    views: u64,
    stars: u64,
    kind: PromptKind,
) -> PromptRecord {
    PromptRecord {
        id: id.to_string(),
        title: title.to_string(),
        content: format!("Content of {title}"),
        tag: "Testing".to_string(),
        views,
        stars,
        created_at: stamp("2024-06-01 10:00:00"),
        kind,
    }
}

// =========================================================================
// Chain assertions
// =========================================================================

/// Route names along a matched chain, root first.
pub fn chain_names(table: &RouteTable, chain: &MatchedChain) -> Vec<String> {
    chain
        .ids
        .iter()
        .map(|&id| table.node(id).name.clone())
        .collect()
}

/// Assert that a chain matched the given route names in order.
pub fn assert_chain(table: &RouteTable, chain: &MatchedChain, expected: &[&str]) {
    let actual = chain_names(table, chain);
    assert_eq!(actual, expected, "matched chain mismatch for {}", chain.path);
}

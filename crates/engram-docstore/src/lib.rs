// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document collections and diversity-aware similarity search for the
//! Engram memory service.
//!
//! ## Architecture
//!
//! - **DocumentStore**: collection definitions (upsert by name), document
//!   upserts by UUID, and the two-phase embedding write
//! - **search**: base similarity ranking under the collection's declared
//!   metric, with pagination
//! - **mmr**: greedy Maximal Marginal Relevance re-ranking that trades
//!   relevance against redundancy

pub mod mmr;
pub mod search;
pub mod store;

pub use mmr::maximal_marginal_relevance;
pub use store::DocumentStore;

/// Register metric descriptions with the installed recorder.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    metrics::describe_histogram!(
        "engram_search_latency_seconds",
        "SearchCollection latency in seconds"
    );
}

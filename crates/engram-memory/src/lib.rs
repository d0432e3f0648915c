// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session memory for the Engram memory service.
//!
//! Provides the durable append/read store for per-session message history
//! and the asynchronous enrichment pipeline that fans message-write events
//! out to registered extractors.
//!
//! ## Architecture
//!
//! - **MemoryStore**: append with transactional sequence assignment, reads
//!   normalized to chronological order at the store boundary
//! - **ExtractorDispatcher**: fixed extractor set, one independent task per
//!   extractor per write event, failures contained
//! - **TokenCountExtractor**: deterministic BPE token counts
//! - **MessageEmbeddingExtractor**: embeddings via the abstract provider

pub mod dispatcher;
pub mod extractors;
pub mod store;

pub use dispatcher::{DispatchHandle, ExtractorDispatcher};
pub use extractors::{MessageEmbeddingExtractor, TokenCountExtractor};
pub use store::MemoryStore;

/// Register metric descriptions with the installed recorder.
///
/// Called once at startup after the recorder is installed. Uses the
/// metrics-rs facade so any recorder (Prometheus, statsd, etc.) can collect
/// these metrics.
pub fn register_metrics() {
    metrics::describe_counter!(
        "engram_dispatch_events_total",
        "Message events fanned out to extractors"
    );
    metrics::describe_counter!(
        "engram_extraction_failures_total",
        "Extractor invocations that returned an error"
    );
}

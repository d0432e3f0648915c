// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Engram memory service.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Engram workspace: session messages and
//! their enrichment set, document collections, search result pages, and the
//! vector math the search engine ranks with.

pub mod error;
pub mod state;
pub mod traits;
pub mod types;
pub mod vector;

// Re-export key items at crate root for ergonomic imports.
pub use error::EngramError;
pub use state::AppState;
pub use types::{
    ComponentType, DistanceMetric, Document, DocumentCollection, DocumentQuery,
    DocumentSearchResultPage, EmbeddingInput, EmbeddingOutput, HealthStatus, Message,
    MessageEvent, NewMessage, Session,
};

// Re-export all capability traits at crate root.
pub use traits::{Component, EmbeddingAdapter, Extractor, StorageAdapter};

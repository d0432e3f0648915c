// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concrete extractors for the enrichment pipeline.
//!
//! Each extractor owns one enrichment field on a message: token_count for
//! the token counter, embedding for the message embedder. Disjoint fields
//! make their concurrent writes to the same message safe.

pub mod embedding;
pub mod token_counter;

pub use embedding::MessageEmbeddingExtractor;
pub use token_counter::TokenCountExtractor;

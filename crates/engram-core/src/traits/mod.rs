// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability trait definitions.
//!
//! Each backend concern gets its own narrow trait rather than one generic
//! container abstraction. All traits use `#[async_trait]` for dynamic
//! dispatch compatibility.

pub mod component;
pub mod embedding;
pub mod extractor;
pub mod storage;

pub use component::Component;
pub use embedding::EmbeddingAdapter;
pub use extractor::Extractor;
pub use storage::StorageAdapter;

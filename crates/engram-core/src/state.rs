// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared application state threaded through every store operation.

use std::sync::Arc;

use engram_config::EngramConfig;

use crate::traits::EmbeddingAdapter;

/// Read-mostly context carrying configuration and the embedding provider
/// handle.
///
/// Built once at process init, immutable afterwards, and passed by reference
/// into each operation. Never a hidden global.
pub struct AppState {
    pub config: EngramConfig,
    pub embedder: Arc<dyn EmbeddingAdapter>,
}

impl AppState {
    pub fn new(config: EngramConfig, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        Self { config, embedder }
    }
}

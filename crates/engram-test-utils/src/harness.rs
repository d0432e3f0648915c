// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for integration tests: temp database, app state, and
//! sample conversation batches.

use std::sync::Arc;

use engram_config::EngramConfig;
use engram_core::{AppState, NewMessage};
use engram_storage::Database;

use crate::mock_embedder::MockEmbedder;

/// Open a fresh database in a temp directory. Keep the TempDir alive for the
/// duration of the test.
pub async fn open_test_database() -> (Arc<Database>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("test.db");
    let db = Database::open(db_path.to_str().expect("utf-8 path"))
        .await
        .expect("open test database");
    (Arc::new(db), dir)
}

/// Default configuration with the embedding dimensionality the mock
/// embedder is built with.
pub fn test_config(dimensions: usize) -> EngramConfig {
    let mut config = EngramConfig::default();
    config.embedding.dimensions = dimensions;
    config
}

/// App state wired to a mock embedder.
pub fn test_app_state(embedder: Arc<MockEmbedder>, dimensions: usize) -> Arc<AppState> {
    Arc::new(AppState::new(test_config(dimensions), embedder))
}

/// A short alternating user/assistant conversation.
pub fn sample_messages(count: usize) -> Vec<NewMessage> {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                NewMessage::new("user", format!("user message {i}"))
            } else {
                NewMessage::new("assistant", format!("assistant reply {i}"))
            }
        })
        .collect()
}

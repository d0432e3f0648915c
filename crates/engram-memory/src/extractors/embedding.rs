// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message-embedding extractor.
//!
//! Embeds each message's content through the abstract embedding provider on
//! the app state and writes the vectors back. The provider is expected to be
//! deterministic for unchanged text, which keeps redelivery safe.

use std::sync::Arc;

use async_trait::async_trait;
use engram_core::{AppState, EmbeddingInput, EngramError, Extractor, MessageEvent};
use engram_storage::{queries, Database};
use tracing::debug;

/// Attaches an embedding to each message in a batch. Owns the embedding
/// column of the enrichment set.
pub struct MessageEmbeddingExtractor {
    db: Arc<Database>,
}

impl MessageEmbeddingExtractor {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Extractor for MessageEmbeddingExtractor {
    fn name(&self) -> &str {
        "message-embedding"
    }

    async fn extract(
        &self,
        state: &AppState,
        event: &MessageEvent,
    ) -> Result<(), EngramError> {
        if !state.config.memory.embed_messages || event.messages.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = event.messages.iter().map(|m| m.content.clone()).collect();
        let output = state
            .embedder
            .embed(EmbeddingInput { texts })
            .await
            .map_err(|e| EngramError::Extraction {
                extractor: "message-embedding".to_string(),
                message: e.to_string(),
            })?;

        if output.embeddings.len() != event.messages.len() {
            return Err(EngramError::Extraction {
                extractor: "message-embedding".to_string(),
                message: format!(
                    "provider returned {} embeddings for {} messages",
                    output.embeddings.len(),
                    event.messages.len()
                ),
            });
        }
        let expected = state.config.embedding.dimensions;
        if output.embeddings.iter().any(|e| e.len() != expected) {
            return Err(EngramError::Extraction {
                extractor: "message-embedding".to_string(),
                message: format!(
                    "provider returned a vector that is not {expected}-dimensional"
                ),
            });
        }

        debug!(
            session_id = %event.session_id,
            messages = event.messages.len(),
            dimensions = output.dimensions,
            "message embeddings computed"
        );

        let updates: Vec<(String, Vec<f32>)> = event
            .messages
            .iter()
            .map(|m| m.uuid.clone())
            .zip(output.embeddings)
            .collect();

        queries::messages::update_message_embeddings(&self.db, updates).await
    }
}

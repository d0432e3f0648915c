// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token-count extractor.
//!
//! Counts BPE tokens per message with a fixed encoding and writes the count
//! back. Counting is pure: identical content always yields the identical
//! count, so redelivery of an event is harmless.

use std::sync::Arc;

use async_trait::async_trait;
use engram_core::{AppState, EngramError, Extractor, MessageEvent};
use engram_storage::{queries, Database};
use tiktoken_rs::CoreBPE;
use tracing::debug;

/// Computes a deterministic token count for each message in a batch and
/// writes it to the token_count column, which this extractor alone owns.
pub struct TokenCountExtractor {
    db: Arc<Database>,
    bpe: CoreBPE,
}

impl TokenCountExtractor {
    /// Create the extractor with the named BPE encoding
    /// ("cl100k_base" or "o200k_base").
    pub fn new(db: Arc<Database>, encoding: &str) -> Result<Self, EngramError> {
        let bpe = match encoding {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            other => {
                return Err(EngramError::Config(format!(
                    "unknown token encoding: {other}"
                )))
            }
        }
        .map_err(|e| EngramError::Internal(format!("failed to load {encoding}: {e}")))?;

        Ok(Self { db, bpe })
    }

    /// Token count for one text. Positive for any non-empty content.
    pub fn count_tokens(&self, text: &str) -> i64 {
        self.bpe.encode_with_special_tokens(text).len() as i64
    }
}

#[async_trait]
impl Extractor for TokenCountExtractor {
    fn name(&self) -> &str {
        "token-count"
    }

    async fn extract(
        &self,
        _state: &AppState,
        event: &MessageEvent,
    ) -> Result<(), EngramError> {
        let counts: Vec<(String, i64)> = event
            .messages
            .iter()
            .map(|m| (m.uuid.clone(), self.count_tokens(&m.content)))
            .collect();

        debug!(
            session_id = %event.session_id,
            messages = counts.len(),
            "token counts computed"
        );
        queries::messages::update_token_counts(&self.db, counts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_test_utils::open_test_database;

    async fn make_extractor() -> (TokenCountExtractor, tempfile::TempDir) {
        let (db, dir) = open_test_database().await;
        (TokenCountExtractor::new(db, "cl100k_base").unwrap(), dir)
    }

    #[tokio::test]
    async fn counts_are_positive_for_non_empty_content() {
        let (extractor, _dir) = make_extractor().await;
        assert!(extractor.count_tokens("hello world") > 0);
        assert!(extractor.count_tokens("a") > 0);
        assert_eq!(extractor.count_tokens(""), 0);
    }

    #[tokio::test]
    async fn counts_are_deterministic() {
        let (extractor, _dir) = make_extractor().await;
        let text = "The quick brown fox jumps over the lazy dog.";
        let first = extractor.count_tokens(text);
        let second = extractor.count_tokens(text);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn longer_content_counts_more_tokens() {
        let (extractor, _dir) = make_extractor().await;
        let short = extractor.count_tokens("hi");
        let long = extractor.count_tokens(
            "This is a considerably longer message with many more words in it.",
        );
        assert!(long > short);
    }

    #[tokio::test]
    async fn unknown_encoding_is_a_config_error() {
        let (db, _dir) = open_test_database().await;
        let result = TokenCountExtractor::new(db, "made-up-encoding");
        assert!(matches!(result, Err(EngramError::Config(_))));
    }
}

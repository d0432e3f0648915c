// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter for deterministic testing.
//!
//! `MockEmbedder` implements `EmbeddingAdapter` with pre-seeded vectors,
//! enabling fast, CI-runnable tests without a model or external API calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use engram_core::vector::l2_normalize;
use engram_core::{
    Component, ComponentType, EmbeddingAdapter, EmbeddingInput, EmbeddingOutput, EngramError,
    HealthStatus,
};

/// A mock embedding provider.
///
/// Texts with a seeded vector get exactly that vector; everything else gets
/// a unit vector derived from a hash of the text, so repeated calls for the
/// same text always agree (the idempotence tests rely on this).
pub struct MockEmbedder {
    dimensions: usize,
    seeded: Mutex<HashMap<String, Vec<f32>>>,
    failing: AtomicBool,
}

impl MockEmbedder {
    /// Create a mock embedder producing vectors of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            seeded: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Pin the vector returned for an exact text.
    pub async fn seed(&self, text: impl Into<String>, vector: Vec<f32>) {
        self.seeded.lock().await.insert(text.into(), vector);
    }

    /// Make every subsequent embed call fail. Used to exercise the
    /// best-effort enrichment contract.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Deterministic unit vector from the text bytes (FNV-1a seeded LCG).
    fn hash_vector(&self, text: &str) -> Vec<f32> {
        let mut state: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in text.bytes() {
            state ^= u64::from(byte);
            state = state.wrapping_mul(0x0000_0100_0000_01b3);
        }
        let mut vector = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            // Map the top bits into [-1, 1).
            vector.push(((state >> 40) as f32 / 8_388_608.0) - 1.0);
        }
        l2_normalize(&vector)
    }
}

#[async_trait]
impl Component for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, EngramError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EngramError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, EngramError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EngramError::Internal(
                "mock embedder configured to fail".to_string(),
            ));
        }

        let seeded = self.seeded.lock().await;
        let embeddings = input
            .texts
            .iter()
            .map(|text| {
                seeded
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| self.hash_vector(text))
            })
            .collect();

        Ok(EmbeddingOutput {
            embeddings,
            dimensions: self.dimensions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_vectors_are_deterministic() {
        let embedder = MockEmbedder::new(8);
        let a = embedder
            .embed(EmbeddingInput {
                texts: vec!["hello".to_string()],
            })
            .await
            .unwrap();
        let b = embedder
            .embed(EmbeddingInput {
                texts: vec!["hello".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(a.embeddings, b.embeddings);
    }

    #[tokio::test]
    async fn distinct_texts_get_distinct_vectors() {
        let embedder = MockEmbedder::new(8);
        let out = embedder
            .embed(EmbeddingInput {
                texts: vec!["cat".to_string(), "dog".to_string()],
            })
            .await
            .unwrap();
        assert_ne!(out.embeddings[0], out.embeddings[1]);
    }

    #[tokio::test]
    async fn seeded_vector_wins() {
        let embedder = MockEmbedder::new(3);
        embedder.seed("cat", vec![1.0, 0.0, 0.0]).await;
        let out = embedder
            .embed(EmbeddingInput {
                texts: vec!["cat".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(out.embeddings[0], vec![1.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn failing_mode_errors() {
        let embedder = MockEmbedder::new(3);
        embedder.set_failing(true);
        let result = embedder
            .embed(EmbeddingInput {
                texts: vec!["cat".to_string()],
            })
            .await;
        assert!(result.is_err());
    }
}

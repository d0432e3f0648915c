// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding provider trait.

use async_trait::async_trait;

use crate::error::EngramError;
use crate::traits::component::Component;
use crate::types::{EmbeddingInput, EmbeddingOutput};

/// Abstract, fallible provider of vector embeddings.
///
/// The embedding pipeline and the search engine call through this trait;
/// the model behind it (local inference, remote API) is an external concern.
#[async_trait]
pub trait EmbeddingAdapter: Component {
    /// Generates one embedding per input text, in order.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, EngramError>;
}

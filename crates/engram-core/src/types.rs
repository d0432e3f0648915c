// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical domain types shared across the Engram workspace.
//!
//! Stores re-export these rather than defining their own row types, so the
//! same struct crosses the storage, pipeline, and search boundaries.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A conversation session. Created implicitly on the first message append;
/// never physically deleted by this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque caller-supplied identifier.
    pub id: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-append timestamp.
    pub updated_at: String,
}

/// A single message within a session.
///
/// `role` and `content` are immutable after the append. `token_count` and
/// `embedding` form the enrichment set: each is written at most once, by the
/// extractor that owns that field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier, assigned by the store at append time.
    pub uuid: String,
    /// Owning session.
    pub session_id: String,
    /// Position within the session. Strictly increasing, assigned after any
    /// existing messages; chronological order is recoverable from this alone.
    pub sequence: i64,
    /// Speaker role ("user", "assistant", "system", ...).
    pub role: String,
    /// Message text.
    pub content: String,
    /// Token count, unset until the token-count extractor has run.
    pub token_count: Option<i64>,
    /// Embedding vector, unset until the embedding extractor has run.
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
    /// Optional caller-supplied JSON metadata.
    pub metadata: Option<String>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// Append payload for a message, before the store assigns identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Option<String>,
}

impl NewMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            metadata: None,
        }
    }
}

/// Ephemeral notification handed to extractors after a durable append.
/// Carries the batch exactly as persisted. Never stored.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub session_id: String,
    pub messages: Vec<Message>,
}

/// Distance metric declared per collection and applied to every similarity
/// computation over its documents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Cosine similarity. The default; insensitive to vector magnitude.
    #[default]
    Cosine,
    /// Raw dot product. Equivalent to cosine for unit-normalized vectors.
    Dot,
    /// Euclidean distance, mapped to a similarity in (0, 1].
    L2,
}

/// A named set of searchable documents sharing one embedding schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentCollection {
    /// Unique name; the upsert key.
    pub name: String,
    pub description: String,
    /// Optional caller-supplied JSON metadata.
    pub metadata: Option<String>,
    /// Dimensionality every document embedding must match.
    pub embedding_dimensions: usize,
    pub distance_metric: DistanceMetric,
    pub created_at: String,
    pub updated_at: String,
}

impl DocumentCollection {
    /// A collection definition with defaults for everything but the
    /// identity fields.
    pub fn new(name: impl Into<String>, embedding_dimensions: usize) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            metadata: None,
            embedding_dimensions,
            distance_metric: DistanceMetric::default(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

/// A document within a collection.
///
/// The embedding is attached by a separate write path and is either fully
/// absent or fully present at the collection's declared dimensionality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Caller-supplied identifier; the upsert key within the collection.
    pub uuid: String,
    pub collection_name: String,
    pub content: String,
    /// Optional caller-supplied JSON metadata.
    pub metadata: Option<String>,
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
    /// Similarity score. Populated only on search results, never persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub created_at: String,
    pub updated_at: String,
}

impl Document {
    pub fn new(uuid: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            collection_name: String::new(),
            content: content.into(),
            metadata: None,
            embedding: None,
            score: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

/// A search query: text to be embedded, an explicit vector, or both
/// (the explicit vector wins when both are present).
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    pub text: Option<String>,
    pub embedding: Option<Vec<f32>>,
}

impl DocumentQuery {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            embedding: None,
        }
    }

    pub fn from_vector(embedding: Vec<f32>) -> Self {
        Self {
            text: None,
            embedding: Some(embedding),
        }
    }
}

/// One page of ranked search results plus pagination metadata.
#[derive(Debug, Clone)]
pub struct DocumentSearchResultPage {
    /// Documents on this page, each with `score` populated.
    pub documents: Vec<Document>,
    /// 1-indexed page number the caller requested.
    pub page_number: i64,
    /// Requested page size (-1 means everything on one page).
    pub page_size: i64,
    /// Total result count across all pages, before slicing.
    pub total_count: usize,
}

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub dimensions: usize,
}

/// Health status reported by component health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Component is fully operational.
    Healthy,
    /// Component is operational but experiencing issues.
    Degraded(String),
    /// Component is not operational.
    Unhealthy(String),
}

/// Identifies the kind of component in health and lifecycle reporting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum ComponentType {
    Storage,
    Embedding,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn distance_metric_round_trips_through_strings() {
        for metric in [DistanceMetric::Cosine, DistanceMetric::Dot, DistanceMetric::L2] {
            let s = metric.to_string();
            let parsed = DistanceMetric::from_str(&s).expect("should parse back");
            assert_eq!(metric, parsed);
        }
        assert_eq!(DistanceMetric::Cosine.to_string(), "cosine");
        assert_eq!(DistanceMetric::default(), DistanceMetric::Cosine);
    }

    #[test]
    fn distance_metric_serde() {
        let json = serde_json::to_string(&DistanceMetric::L2).expect("should serialize");
        assert_eq!(json, "\"l2\"");
        let parsed: DistanceMetric = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(parsed, DistanceMetric::L2);
    }

    #[test]
    fn new_message_defaults() {
        let msg = NewMessage::new("user", "hello");
        assert_eq!(msg.role, "user");
        assert_eq!(msg.content, "hello");
        assert!(msg.metadata.is_none());
    }

    #[test]
    fn document_score_never_serialized_when_absent() {
        let doc = Document::new("d1", "content");
        let json = serde_json::to_string(&doc).expect("should serialize");
        assert!(!json.contains("score"));
    }

    #[test]
    fn query_constructors() {
        let q = DocumentQuery::from_text("cats");
        assert!(q.embedding.is_none());
        let q = DocumentQuery::from_vector(vec![0.1, 0.2]);
        assert!(q.text.is_none());
        assert_eq!(q.embedding.unwrap().len(), 2);
    }
}

// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Engram memory service.

use thiserror::Error;

/// The primary error type used across all Engram stores and pipelines.
#[derive(Debug, Error)]
pub enum EngramError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed input (dimensionality mismatch, negative limit, empty query).
    #[error("validation error: {0}")]
    Validation(String),

    /// A session, collection, or document that the caller named does not exist.
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An extractor failed to process a message batch. Reported, never
    /// propagated back to the writer that triggered the dispatch.
    #[error("extraction failed in {extractor}: {message}")]
    Extraction { extractor: String, message: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngramError {
    /// Construct a `NotFound` for the given entity kind and key.
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        EngramError::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Whether this error is a `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngramError::NotFound { .. })
    }

    /// Whether this error is a `Validation`.
    pub fn is_validation(&self) -> bool {
        matches!(self, EngramError::Validation(_))
    }
}

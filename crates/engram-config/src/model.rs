// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Engram memory service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Engram configuration.
///
/// Loaded from a TOML file with environment variable overrides. All sections
/// are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngramConfig {
    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Embedding provider settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Session memory and enrichment pipeline settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Document search settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("engram").join("engram.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("engram.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Name of the embedding model behind the adapter.
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Dimensionality the adapter is expected to produce.
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            dimensions: default_dimensions(),
        }
    }
}

fn default_model_name() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_dimensions() -> usize {
    384
}

/// Session memory and enrichment pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Enable the enrichment pipeline. When false, appends still persist but
    /// no extractors are dispatched.
    #[serde(default = "default_memory_enabled")]
    pub enabled: bool,

    /// BPE encoding used by the token-count extractor.
    #[serde(default = "default_token_encoding")]
    pub token_encoding: String,

    /// Compute an embedding for every stored message.
    #[serde(default = "default_embed_messages")]
    pub embed_messages: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_memory_enabled(),
            token_encoding: default_token_encoding(),
            embed_messages: default_embed_messages(),
        }
    }
}

fn default_memory_enabled() -> bool {
    true
}

fn default_token_encoding() -> String {
    "cl100k_base".to_string()
}

fn default_embed_messages() -> bool {
    true
}

/// Document search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// MMR relevance/diversity tradeoff in [0, 1]. 1.0 is pure relevance,
    /// 0.0 is pure diversity.
    #[serde(default = "default_mmr_lambda")]
    pub mmr_lambda: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mmr_lambda: default_mmr_lambda(),
        }
    }
}

fn default_mmr_lambda() -> f32 {
    0.5
}

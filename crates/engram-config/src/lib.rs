// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Engram memory service.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), platform config-directory lookup, and
//! environment variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use engram_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("database: {}", config.storage.database_path);
//! ```

pub mod loader;
pub mod model;

use thiserror::Error;

pub use loader::{default_config_path, load_config, load_config_from_path, load_config_from_str};
pub use model::{EmbeddingConfig, EngramConfig, MemoryConfig, SearchConfig, StorageConfig};

/// Errors surfaced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment failed to assemble or deserialize the configuration.
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    /// The configuration deserialized but a value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load configuration from the default hierarchy and validate it.
pub fn load_and_validate() -> Result<EngramConfig, ConfigError> {
    let config = loader::load_config()?;
    validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<EngramConfig, ConfigError> {
    let config = loader::load_config_from_str(toml_content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Post-deserialization range checks.
pub fn validate_config(config: &EngramConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&config.search.mmr_lambda) {
        return Err(ConfigError::Invalid(format!(
            "search.mmr_lambda must be within [0.0, 1.0], got {}",
            config.search.mmr_lambda
        )));
    }
    if config.embedding.dimensions == 0 {
        return Err(ConfigError::Invalid(
            "embedding.dimensions must be greater than zero".to_string(),
        ));
    }
    if config.storage.database_path.is_empty() {
        return Err(ConfigError::Invalid(
            "storage.database_path must not be empty".to_string(),
        ));
    }
    if config.memory.token_encoding.is_empty() {
        return Err(ConfigError::Invalid(
            "memory.token_encoding must not be empty".to_string(),
        ));
    }
    Ok(())
}

// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loading via Figment: defaults, TOML file, env overrides.
//!
//! Precedence, lowest to highest: struct defaults, `config.toml` from the
//! platform config directory (or an explicit path), then `ENGRAM_*`
//! environment variables (`ENGRAM_SEARCH__MMR_LAMBDA=0.7` style).

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;

use crate::model::EngramConfig;

/// Default config file location: `<config_dir>/engram/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("engram").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

fn base_figment() -> Figment {
    Figment::from(Serialized::defaults(EngramConfig::default()))
}

/// Load configuration from the default file location plus env overrides.
///
/// A missing config file is not an error; defaults and env apply.
pub fn load_config() -> Result<EngramConfig, figment::Error> {
    base_figment()
        .merge(Toml::file(default_config_path()))
        .merge(Env::prefixed("ENGRAM_").split("__"))
        .extract()
}

/// Load configuration from an explicit TOML file path plus env overrides.
pub fn load_config_from_path(path: &Path) -> Result<EngramConfig, figment::Error> {
    base_figment()
        .merge(Toml::file(path))
        .merge(Env::prefixed("ENGRAM_").split("__"))
        .extract()
}

/// Load configuration from a TOML string. No env overrides; used by tests
/// and embedders that manage configuration themselves.
pub fn load_config_from_str(toml_content: &str) -> Result<EngramConfig, figment::Error> {
    base_figment().merge(Toml::string(toml_content)).extract()
}

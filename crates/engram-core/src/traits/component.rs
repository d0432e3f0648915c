// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait for long-lived backend components.

use async_trait::async_trait;

use crate::error::EngramError;
use crate::types::{ComponentType, HealthStatus};

/// Identity, health check, and shutdown for a backend component
/// (storage, embedding provider).
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// Returns the human-readable name of this component instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this component.
    fn version(&self) -> semver::Version;

    /// Returns the kind of component.
    fn component_type(&self) -> ComponentType;

    /// Performs a health check and returns the component's current status.
    async fn health_check(&self) -> Result<HealthStatus, EngramError>;

    /// Gracefully shuts down the component, releasing any held resources.
    async fn shutdown(&self) -> Result<(), EngramError>;
}

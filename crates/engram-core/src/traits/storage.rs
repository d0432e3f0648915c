// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage backend lifecycle trait.

use async_trait::async_trait;

use crate::error::EngramError;
use crate::traits::component::Component;

/// Lifecycle of a persistence backend.
///
/// Implementations manage connection setup and teardown and provide the
/// substrate the session and document stores run their queries against.
#[async_trait]
pub trait StorageAdapter: Component {
    /// Initializes the storage backend (migrations, PRAGMAs, connection).
    async fn initialize(&self) -> Result<(), EngramError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), EngramError>;
}

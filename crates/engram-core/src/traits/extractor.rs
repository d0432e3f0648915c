// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature extractor trait for the message enrichment pipeline.

use async_trait::async_trait;

use crate::error::EngramError;
use crate::state::AppState;
use crate::types::MessageEvent;

/// A unit that derives an attribute (token count, embedding) from a batch of
/// newly persisted messages and writes it back.
///
/// Extractors are registered once at process init and invoked by the
/// dispatcher on every successful append. An implementation must be
/// idempotent: invoked twice on the same unchanged message, it writes the
/// same enriched value, which makes at-least-once delivery safe. Each
/// extractor owns a disjoint enrichment field, so concurrently running
/// extractors never contend on the same column.
#[async_trait]
pub trait Extractor: Send + Sync + 'static {
    /// Short identifier used in logs and failure metrics.
    fn name(&self) -> &str;

    /// Processes one message event. A returned error is reported by the
    /// dispatcher and never rolls back the underlying write.
    async fn extract(&self, state: &AppState, event: &MessageEvent)
        -> Result<(), EngramError>;
}

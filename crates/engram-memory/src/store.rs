// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session memory store: durable append plus chronological reads.
//!
//! The append is synchronous and all-or-nothing; extractor dispatch happens
//! after the commit and never blocks or fails the caller.

use std::sync::Arc;

use engram_core::{AppState, EngramError, Message, MessageEvent, NewMessage};
use engram_storage::queries;
use engram_storage::Database;
use tracing::debug;
use uuid::Uuid;

use crate::dispatcher::ExtractorDispatcher;

/// Per-session message history over the shared SQLite substrate.
pub struct MemoryStore {
    db: Arc<Database>,
    dispatcher: Arc<ExtractorDispatcher>,
}

impl MemoryStore {
    pub fn new(db: Arc<Database>, dispatcher: Arc<ExtractorDispatcher>) -> Self {
        Self { db, dispatcher }
    }

    /// Append a batch of messages to a session.
    ///
    /// The session is created implicitly on first use. Sequence positions
    /// are assigned after any existing messages inside one transaction, so
    /// a failed batch leaves nothing visible. After the durable append, the
    /// batch is handed to the dispatcher; this call does not wait for
    /// extractors.
    pub async fn put_memory(
        &self,
        state: &Arc<AppState>,
        session_id: &str,
        messages: Vec<NewMessage>,
    ) -> Result<Vec<Message>, EngramError> {
        if session_id.is_empty() {
            return Err(EngramError::Validation(
                "session id must not be empty".to_string(),
            ));
        }
        if messages.is_empty() {
            return Ok(vec![]);
        }

        let now = chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string();
        let rows: Vec<Message> = messages
            .into_iter()
            .map(|m| Message {
                uuid: Uuid::new_v4().to_string(),
                session_id: session_id.to_string(),
                sequence: 0,
                role: m.role,
                content: m.content,
                token_count: None,
                embedding: None,
                metadata: m.metadata,
                created_at: now.clone(),
            })
            .collect();

        let appended = queries::messages::append_messages(&self.db, session_id, rows).await?;
        debug!(session_id, count = appended.len(), "messages appended");

        if state.config.memory.enabled {
            let event = MessageEvent {
                session_id: session_id.to_string(),
                messages: appended.clone(),
            };
            // Fire-and-forget: enrichment is best-effort, persistence is not.
            let _ = self.dispatcher.dispatch(Arc::clone(state), event);
        }

        Ok(appended)
    }

    /// Read a session's messages in chronological (ascending sequence) order.
    ///
    /// `last_n == 0` means no limit. A nonzero `last_n` fetches the most
    /// recent N via the efficient descending scan and reverses here: the
    /// chronological contract is enforced at this boundary, not by callers.
    pub async fn get_memory(
        &self,
        session_id: &str,
        last_n: usize,
    ) -> Result<Vec<Message>, EngramError> {
        let messages = if last_n == 0 {
            queries::messages::get_messages_chronological(&self.db, session_id).await?
        } else {
            let mut recent =
                queries::messages::get_recent_messages(&self.db, session_id, last_n as i64)
                    .await?;
            recent.reverse();
            recent
        };

        if messages.is_empty() {
            return Err(EngramError::not_found("session", session_id));
        }
        Ok(messages)
    }
}

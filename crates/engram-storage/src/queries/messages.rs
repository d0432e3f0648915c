// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message append, reads, and per-field enrichment updates.
//!
//! The append assigns sequence positions inside one transaction, so a batch
//! is all-or-nothing and positions are strictly increasing even under
//! concurrent appends to the same session.

use engram_core::vector::{blob_to_vec, vec_to_blob};
use engram_core::EngramError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Message;

fn row_to_message(row: &rusqlite::Row) -> rusqlite::Result<Message> {
    let embedding_blob: Option<Vec<u8>> = row.get(6)?;
    Ok(Message {
        uuid: row.get(0)?,
        session_id: row.get(1)?,
        sequence: row.get(2)?,
        role: row.get(3)?,
        content: row.get(4)?,
        token_count: row.get(5)?,
        embedding: embedding_blob.map(|b| blob_to_vec(&b)),
        metadata: row.get(7)?,
        created_at: row.get(8)?,
    })
}

const MESSAGE_COLUMNS: &str =
    "uuid, session_id, sequence, role, content, token_count, embedding, metadata, created_at";

/// Append a batch of messages to a session in one transaction.
///
/// Creates the session row if absent, assigns sequence positions after any
/// existing ones, and inserts the batch. Returns the messages with their
/// assigned positions. Nothing is visible if any insert fails.
pub async fn append_messages(
    db: &Database,
    session_id: &str,
    messages: Vec<Message>,
) -> Result<Vec<Message>, EngramError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO sessions (id) VALUES (?1)
                 ON CONFLICT(id) DO UPDATE
                 SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![session_id],
            )?;

            let last: i64 = tx.query_row(
                "SELECT COALESCE(MAX(sequence), 0) FROM messages WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )?;

            let mut appended = Vec::with_capacity(messages.len());
            for (offset, mut msg) in messages.into_iter().enumerate() {
                msg.session_id = session_id.clone();
                msg.sequence = last + offset as i64 + 1;
                tx.execute(
                    "INSERT INTO messages (uuid, session_id, sequence, role, content, metadata, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        msg.uuid,
                        msg.session_id,
                        msg.sequence,
                        msg.role,
                        msg.content,
                        msg.metadata,
                        msg.created_at,
                    ],
                )?;
                appended.push(msg);
            }

            tx.commit()?;
            Ok(appended)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get all messages for a session in chronological (ascending sequence) order.
pub async fn get_messages_chronological(
    db: &Database,
    session_id: &str,
) -> Result<Vec<Message>, EngramError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE session_id = ?1 ORDER BY sequence ASC",
            ))?;
            let rows = stmt.query_map(params![session_id], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get the most recent `limit` messages for a session.
///
/// Returned most-recent-first (the efficient scan order). Callers that need
/// the chronological contract must reverse; the memory store does this at
/// its boundary.
pub async fn get_recent_messages(
    db: &Database,
    session_id: &str,
    limit: i64,
) -> Result<Vec<Message>, EngramError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE session_id = ?1 ORDER BY sequence DESC LIMIT ?2",
            ))?;
            let rows = stmt.query_map(params![session_id, limit], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Write token counts for a batch of messages, one transaction.
///
/// The token_count column belongs to the token-count extractor alone, so
/// this never races with embedding writes to the same rows.
pub async fn update_token_counts(
    db: &Database,
    counts: Vec<(String, i64)>,
) -> Result<(), EngramError> {
    if counts.is_empty() {
        return Ok(());
    }
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for (uuid, count) in &counts {
                tx.execute(
                    "UPDATE messages SET token_count = ?1 WHERE uuid = ?2",
                    params![count, uuid],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Write embeddings for a batch of messages, one transaction.
pub async fn update_message_embeddings(
    db: &Database,
    embeddings: Vec<(String, Vec<f32>)>,
) -> Result<(), EngramError> {
    if embeddings.is_empty() {
        return Ok(());
    }
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for (uuid, embedding) in &embeddings {
                let blob = vec_to_blob(embedding);
                tx.execute(
                    "UPDATE messages SET embedding = ?1 WHERE uuid = ?2",
                    params![blob, uuid],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

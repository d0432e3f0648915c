// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document CRUD and the two-phase embedding write.
//!
//! `put_documents` never touches the embedding column; `put_document_embeddings`
//! touches nothing else. Keeping the paths separate keeps the common
//! metadata-update cheap and lets embeddings arrive from a slower process.

use engram_core::vector::{blob_to_vec, vec_to_blob};
use engram_core::EngramError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Document;

fn row_to_document(row: &rusqlite::Row) -> rusqlite::Result<Document> {
    let embedding_blob: Option<Vec<u8>> = row.get(4)?;
    Ok(Document {
        uuid: row.get(0)?,
        collection_name: row.get(1)?,
        content: row.get(2)?,
        metadata: row.get(3)?,
        embedding: embedding_blob.map(|b| blob_to_vec(&b)),
        score: None,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const DOCUMENT_COLUMNS: &str =
    "uuid, collection_name, content, metadata, embedding, created_at, updated_at";

/// Upsert document content and metadata by UUID, one transaction.
///
/// The embedding column is deliberately left alone: existing embeddings
/// survive a content update, and new documents start without one.
pub async fn put_documents(
    db: &Database,
    collection_name: &str,
    documents: Vec<Document>,
) -> Result<(), EngramError> {
    let collection_name = collection_name.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for doc in &documents {
                tx.execute(
                    "INSERT INTO documents (uuid, collection_name, content, metadata)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(collection_name, uuid) DO UPDATE SET
                         content = excluded.content,
                         metadata = excluded.metadata,
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                    params![doc.uuid, collection_name, doc.content, doc.metadata],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Attach embeddings to existing documents, one transaction.
///
/// Returns the first UUID that did not match an existing document, in which
/// case nothing is written; returns None when every update landed.
pub async fn put_document_embeddings(
    db: &Database,
    collection_name: &str,
    embeddings: Vec<(String, Vec<f32>)>,
) -> Result<Option<String>, EngramError> {
    let collection_name = collection_name.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for (uuid, embedding) in &embeddings {
                let blob = vec_to_blob(embedding);
                let changed = tx.execute(
                    "UPDATE documents SET
                         embedding = ?1,
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE collection_name = ?2 AND uuid = ?3",
                    params![blob, collection_name, uuid],
                )?;
                if changed == 0 {
                    // Dropping the transaction rolls back earlier updates.
                    return Ok(Some(uuid.clone()));
                }
            }
            tx.commit()?;
            Ok(None)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Point lookups by UUID. Result order is unspecified; callers that care
/// about order re-sort.
pub async fn get_documents(
    db: &Database,
    collection_name: &str,
    uuids: Vec<String>,
) -> Result<Vec<Document>, EngramError> {
    if uuids.is_empty() {
        return Ok(vec![]);
    }
    let collection_name = collection_name.to_string();
    db.connection()
        .call(move |conn| {
            let placeholders: Vec<String> =
                (2..=uuids.len() + 1).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "SELECT {DOCUMENT_COLUMNS} FROM documents
                 WHERE collection_name = ?1 AND uuid IN ({})",
                placeholders.join(", ")
            );
            let mut stmt = conn.prepare(&sql)?;

            let mut query_params: Vec<&dyn rusqlite::types::ToSql> =
                vec![&collection_name as &dyn rusqlite::types::ToSql];
            query_params
                .extend(uuids.iter().map(|u| u as &dyn rusqlite::types::ToSql));

            let rows = stmt.query_map(query_params.as_slice(), row_to_document)?;
            let mut documents = Vec::new();
            for row in rows {
                documents.push(row?);
            }
            Ok(documents)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete one document by UUID. Returns false if it did not exist.
pub async fn delete_document(
    db: &Database,
    collection_name: &str,
    uuid: &str,
) -> Result<bool, EngramError> {
    let collection_name = collection_name.to_string();
    let uuid = uuid.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM documents WHERE collection_name = ?1 AND uuid = ?2",
                params![collection_name, uuid],
            )?;
            Ok(deleted > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Lightweight `(uuid, embedding)` scan for ranking. Documents without an
/// embedding are skipped: a search never sees a half-written vector because
/// the embedding write is a single-column transactional update.
pub async fn get_document_embeddings(
    db: &Database,
    collection_name: &str,
) -> Result<Vec<(String, Vec<f32>)>, EngramError> {
    let collection_name = collection_name.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT uuid, embedding FROM documents
                 WHERE collection_name = ?1 AND embedding IS NOT NULL",
            )?;
            let rows = stmt.query_map(params![collection_name], |row| {
                let uuid: String = row.get(0)?;
                let blob: Vec<u8> = row.get(1)?;
                Ok((uuid, blob_to_vec(&blob)))
            })?;
            let mut results = Vec::new();
            for row in rows {
                results.push(row?);
            }
            Ok(results)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::collections::put_collection;
    use engram_core::types::DocumentCollection;
    use tempfile::tempdir;

    async fn setup_db_with_collection() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        put_collection(&db, &DocumentCollection::new("docs", 3))
            .await
            .unwrap();
        (db, dir)
    }

    fn make_doc(uuid: &str, content: &str) -> Document {
        Document::new(uuid, content)
    }

    #[tokio::test]
    async fn put_and_get_documents() {
        let (db, _dir) = setup_db_with_collection().await;

        put_documents(
            &db,
            "docs",
            vec![make_doc("d1", "cat"), make_doc("d2", "dog")],
        )
        .await
        .unwrap();

        let docs = get_documents(&db, "docs", vec!["d1".to_string(), "d2".to_string()])
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.embedding.is_none()));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn upsert_by_uuid_overwrites_content_keeps_embedding() {
        let (db, _dir) = setup_db_with_collection().await;

        put_documents(&db, "docs", vec![make_doc("d1", "cat")]).await.unwrap();
        put_document_embeddings(&db, "docs", vec![("d1".to_string(), vec![1.0, 0.0, 0.0])])
            .await
            .unwrap();

        // Content update must not clear the embedding.
        put_documents(&db, "docs", vec![make_doc("d1", "feline")]).await.unwrap();

        let docs = get_documents(&db, "docs", vec!["d1".to_string()]).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "feline");
        assert_eq!(docs[0].embedding.as_ref().unwrap().len(), 3);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn embedding_write_for_missing_uuid_reports_and_rolls_back() {
        let (db, _dir) = setup_db_with_collection().await;

        put_documents(&db, "docs", vec![make_doc("d1", "cat")]).await.unwrap();

        let missing = put_document_embeddings(
            &db,
            "docs",
            vec![
                ("d1".to_string(), vec![1.0, 0.0, 0.0]),
                ("ghost".to_string(), vec![0.0, 1.0, 0.0]),
            ],
        )
        .await
        .unwrap();
        assert_eq!(missing.as_deref(), Some("ghost"));

        // d1's update was rolled back along with the failed batch.
        let docs = get_documents(&db, "docs", vec!["d1".to_string()]).await.unwrap();
        assert!(docs[0].embedding.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn embeddings_scan_skips_unembedded_documents() {
        let (db, _dir) = setup_db_with_collection().await;

        put_documents(
            &db,
            "docs",
            vec![make_doc("d1", "cat"), make_doc("d2", "dog")],
        )
        .await
        .unwrap();
        put_document_embeddings(&db, "docs", vec![("d1".to_string(), vec![1.0, 0.0, 0.0])])
            .await
            .unwrap();

        let embeddings = get_document_embeddings(&db, "docs").await.unwrap();
        assert_eq!(embeddings.len(), 1);
        assert_eq!(embeddings[0].0, "d1");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_document_reports_existence() {
        let (db, _dir) = setup_db_with_collection().await;

        put_documents(&db, "docs", vec![make_doc("d1", "cat")]).await.unwrap();
        assert!(delete_document(&db, "docs", "d1").await.unwrap());
        assert!(!delete_document(&db, "docs", "d1").await.unwrap());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_documents_empty_request() {
        let (db, _dir) = setup_db_with_collection().await;
        let docs = get_documents(&db, "docs", vec![]).await.unwrap();
        assert!(docs.is_empty());
        db.close().await.unwrap();
    }
}

// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collection CRUD operations.

use engram_core::EngramError;
use rusqlite::params;

use crate::database::Database;
use crate::models::DocumentCollection;

fn row_to_collection(row: &rusqlite::Row) -> rusqlite::Result<DocumentCollection> {
    let metric: String = row.get(4)?;
    Ok(DocumentCollection {
        name: row.get(0)?,
        description: row.get(1)?,
        metadata: row.get(2)?,
        embedding_dimensions: row.get::<_, i64>(3)? as usize,
        distance_metric: metric.parse().unwrap_or_default(),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const COLLECTION_COLUMNS: &str =
    "name, description, metadata, embedding_dimensions, distance_metric, created_at, updated_at";

/// Create or fully overwrite a collection definition by name.
///
/// An existing row keeps its created_at; every definition field is replaced.
pub async fn put_collection(
    db: &Database,
    collection: &DocumentCollection,
) -> Result<(), EngramError> {
    let collection = collection.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO collections (name, description, metadata, embedding_dimensions, distance_metric)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(name) DO UPDATE SET
                     description = excluded.description,
                     metadata = excluded.metadata,
                     embedding_dimensions = excluded.embedding_dimensions,
                     distance_metric = excluded.distance_metric,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![
                    collection.name,
                    collection.description,
                    collection.metadata,
                    collection.embedding_dimensions as i64,
                    collection.distance_metric.to_string(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a collection by name.
pub async fn get_collection(
    db: &Database,
    name: &str,
) -> Result<Option<DocumentCollection>, EngramError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLLECTION_COLUMNS} FROM collections WHERE name = ?1",
            ))?;
            let result = stmt.query_row(params![name], row_to_collection);
            match result {
                Ok(collection) => Ok(Some(collection)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all collections, ordered by name.
pub async fn list_collections(db: &Database) -> Result<Vec<DocumentCollection>, EngramError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLLECTION_COLUMNS} FROM collections ORDER BY name ASC",
            ))?;
            let rows = stmt.query_map([], row_to_collection)?;
            let mut collections = Vec::new();
            for row in rows {
                collections.push(row?);
            }
            Ok(collections)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a collection and, in the same transaction, all its documents.
///
/// Returns false if no collection with that name existed.
pub async fn delete_collection(db: &Database, name: &str) -> Result<bool, EngramError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM documents WHERE collection_name = ?1",
                params![name],
            )?;
            let deleted = tx.execute("DELETE FROM collections WHERE name = ?1", params![name])?;
            tx.commit()?;
            Ok(deleted > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count collections. Used by the startup hook to verify the schema is live.
pub async fn count_collections(db: &Database) -> Result<i64, EngramError> {
    db.connection()
        .call(|conn| {
            let n = conn.query_row("SELECT COUNT(*) FROM collections", [], |row| row.get(0))?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_core::types::DistanceMetric;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_collection(name: &str, dims: usize) -> DocumentCollection {
        DocumentCollection {
            name: name.to_string(),
            description: "test collection".to_string(),
            metadata: None,
            embedding_dimensions: dims,
            distance_metric: DistanceMetric::Cosine,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[tokio::test]
    async fn put_and_get_collection() {
        let (db, _dir) = setup_db().await;

        put_collection(&db, &make_collection("docs", 384)).await.unwrap();

        let retrieved = get_collection(&db, "docs").await.unwrap().unwrap();
        assert_eq!(retrieved.name, "docs");
        assert_eq!(retrieved.embedding_dimensions, 384);
        assert_eq!(retrieved.distance_metric, DistanceMetric::Cosine);
        assert!(!retrieved.created_at.is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn put_with_existing_name_overwrites() {
        let (db, _dir) = setup_db().await;

        put_collection(&db, &make_collection("docs", 384)).await.unwrap();

        let mut replacement = make_collection("docs", 768);
        replacement.description = "replaced".to_string();
        replacement.distance_metric = DistanceMetric::L2;
        put_collection(&db, &replacement).await.unwrap();

        let all = list_collections(&db).await.unwrap();
        assert_eq!(all.len(), 1, "overwrite must not duplicate");

        let retrieved = get_collection(&db, "docs").await.unwrap().unwrap();
        assert_eq!(retrieved.embedding_dimensions, 768);
        assert_eq!(retrieved.description, "replaced");
        assert_eq!(retrieved.distance_metric, DistanceMetric::L2);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_unknown_collection_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_collection(&db, "missing").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_collections_ordered_by_name() {
        let (db, _dir) = setup_db().await;

        put_collection(&db, &make_collection("zebra", 3)).await.unwrap();
        put_collection(&db, &make_collection("alpha", 3)).await.unwrap();

        let all = list_collections(&db).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "alpha");
        assert_eq!(all[1].name, "zebra");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_collection_reports_existence() {
        let (db, _dir) = setup_db().await;

        put_collection(&db, &make_collection("docs", 3)).await.unwrap();
        assert!(delete_collection(&db, "docs").await.unwrap());
        assert!(!delete_collection(&db, "docs").await.unwrap());
        assert!(get_collection(&db, "docs").await.unwrap().is_none());

        db.close().await.unwrap();
    }
}

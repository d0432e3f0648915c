// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document store: named collections, document upserts, and the two-phase
//! embedding write.

use std::sync::Arc;

use engram_core::{AppState, Document, DocumentCollection, EngramError};
use engram_storage::queries;
use engram_storage::Database;
use tracing::{debug, info};

/// Collections and their documents over the shared SQLite substrate.
pub struct DocumentStore {
    pub(crate) db: Arc<Database>,
}

impl DocumentStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// One-time initialization hook, invoked before the store serves
    /// traffic. Verifies the schema is reachable.
    pub async fn on_start(&self, _state: &AppState) -> Result<(), EngramError> {
        let count = queries::collections::count_collections(&self.db).await?;
        info!(collections = count, "document store ready");
        Ok(())
    }

    /// Create or fully overwrite a collection definition by name.
    ///
    /// Re-running with the same name discards the prior definition; the
    /// collection's documents are untouched.
    pub async fn put_collection(
        &self,
        collection: &DocumentCollection,
    ) -> Result<(), EngramError> {
        if collection.name.is_empty() {
            return Err(EngramError::Validation(
                "collection name must not be empty".to_string(),
            ));
        }
        if collection.embedding_dimensions == 0 {
            return Err(EngramError::Validation(
                "collection embedding_dimensions must be greater than zero".to_string(),
            ));
        }
        queries::collections::put_collection(&self.db, collection).await?;
        debug!(name = %collection.name, dimensions = collection.embedding_dimensions, "collection put");
        Ok(())
    }

    /// Get a collection by name.
    pub async fn get_collection(&self, name: &str) -> Result<DocumentCollection, EngramError> {
        queries::collections::get_collection(&self.db, name)
            .await?
            .ok_or_else(|| EngramError::not_found("collection", name))
    }

    /// List all collections.
    pub async fn get_collection_list(&self) -> Result<Vec<DocumentCollection>, EngramError> {
        queries::collections::list_collections(&self.db).await
    }

    /// Delete a collection and, transactionally, all its documents.
    pub async fn delete_collection(&self, name: &str) -> Result<(), EngramError> {
        if queries::collections::delete_collection(&self.db, name).await? {
            debug!(name, "collection deleted");
            Ok(())
        } else {
            Err(EngramError::not_found("collection", name))
        }
    }

    /// Upsert document content and metadata by UUID.
    ///
    /// Embeddings are intentionally not part of this call; see
    /// [`put_document_embeddings`](Self::put_document_embeddings).
    pub async fn put_documents(
        &self,
        collection_name: &str,
        documents: Vec<Document>,
    ) -> Result<(), EngramError> {
        // Surface unknown collections as NotFound rather than a foreign key
        // failure from the insert.
        self.get_collection(collection_name).await?;

        if documents.iter().any(|d| d.uuid.is_empty()) {
            return Err(EngramError::Validation(
                "every document must carry a uuid".to_string(),
            ));
        }
        if documents.is_empty() {
            return Ok(());
        }

        let count = documents.len();
        queries::documents::put_documents(&self.db, collection_name, documents).await?;
        debug!(collection = collection_name, count, "documents put");
        Ok(())
    }

    /// Attach embedding vectors to already-existing documents, matched by
    /// UUID. A separate write path from `put_documents`: embeddings are
    /// large and computed out-of-band, and the common metadata-update path
    /// must stay cheap.
    pub async fn put_document_embeddings(
        &self,
        collection_name: &str,
        documents: Vec<Document>,
    ) -> Result<(), EngramError> {
        let collection = self.get_collection(collection_name).await?;

        let mut embeddings = Vec::with_capacity(documents.len());
        for doc in documents {
            let embedding = doc.embedding.ok_or_else(|| {
                EngramError::Validation(format!(
                    "document {} carries no embedding",
                    doc.uuid
                ))
            })?;
            if embedding.len() != collection.embedding_dimensions {
                return Err(EngramError::Validation(format!(
                    "embedding for document {} has {} dimensions, collection {} declares {}",
                    doc.uuid,
                    embedding.len(),
                    collection.name,
                    collection.embedding_dimensions
                )));
            }
            embeddings.push((doc.uuid, embedding));
        }
        if embeddings.is_empty() {
            return Ok(());
        }

        let count = embeddings.len();
        match queries::documents::put_document_embeddings(&self.db, collection_name, embeddings)
            .await?
        {
            Some(missing_uuid) => Err(EngramError::not_found("document", missing_uuid)),
            None => {
                debug!(collection = collection_name, count, "document embeddings put");
                Ok(())
            }
        }
    }

    /// Point lookups by UUID, returned in the requested order. UUIDs with no
    /// matching document are omitted.
    pub async fn get_documents(
        &self,
        collection_name: &str,
        uuids: Vec<String>,
    ) -> Result<Vec<Document>, EngramError> {
        self.get_collection(collection_name).await?;

        let found =
            queries::documents::get_documents(&self.db, collection_name, uuids.clone()).await?;
        let mut by_uuid: std::collections::HashMap<String, Document> = found
            .into_iter()
            .map(|d| (d.uuid.clone(), d))
            .collect();
        Ok(uuids
            .into_iter()
            .filter_map(|uuid| by_uuid.remove(&uuid))
            .collect())
    }

    /// Delete one document by UUID.
    pub async fn delete_document(
        &self,
        collection_name: &str,
        uuid: &str,
    ) -> Result<(), EngramError> {
        self.get_collection(collection_name).await?;

        if queries::documents::delete_document(&self.db, collection_name, uuid).await? {
            Ok(())
        } else {
            Err(EngramError::not_found("document", uuid))
        }
    }
}

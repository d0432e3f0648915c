// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Similarity search over a collection, with optional MMR diversification
//! and pagination.
//!
//! The ranking scan is a lock-free snapshot: it reads whatever embeddings
//! are committed at that moment and may miss a concurrent write, but never
//! sees a partial vector.

use std::collections::HashMap;
use std::time::Instant;

use engram_core::vector::similarity;
use engram_core::{
    AppState, DocumentQuery, DocumentSearchResultPage, EmbeddingInput, EngramError,
};
use engram_storage::queries;
use tracing::debug;

use crate::mmr::{maximal_marginal_relevance, RankedCandidate};
use crate::store::DocumentStore;

impl DocumentStore {
    /// Rank a collection's documents against a query.
    ///
    /// - `limit` bounds the documents returned; 0 means unbounded.
    /// - `mmr` re-ranks for diversity; the candidate pool is the full base
    ///   ranking so a diverse document outside the top-`limit` can displace
    ///   a redundant one.
    /// - `page_number` is 1-indexed; `page_size == -1` returns everything on
    ///   one page. A page past the end is empty, not an error.
    pub async fn search_collection(
        &self,
        state: &AppState,
        collection_name: &str,
        query: &DocumentQuery,
        limit: i64,
        mmr: bool,
        page_number: i64,
        page_size: i64,
    ) -> Result<DocumentSearchResultPage, EngramError> {
        let started = Instant::now();

        if limit < 0 {
            return Err(EngramError::Validation(format!(
                "limit must be non-negative, got {limit}"
            )));
        }
        if page_number < 1 {
            return Err(EngramError::Validation(format!(
                "page_number is 1-indexed, got {page_number}"
            )));
        }
        if page_size == 0 || page_size < -1 {
            return Err(EngramError::Validation(format!(
                "page_size must be positive or -1, got {page_size}"
            )));
        }

        let collection = self.get_collection(collection_name).await?;

        let query_embedding = resolve_query_embedding(state, query).await?;
        if query_embedding.len() != collection.embedding_dimensions {
            return Err(EngramError::Validation(format!(
                "query embedding has {} dimensions, collection {} declares {}",
                query_embedding.len(),
                collection.name,
                collection.embedding_dimensions
            )));
        }

        // Base ranking: similarity against every committed embedding,
        // descending. Documents still awaiting their embedding are absent
        // from the scan.
        let candidates =
            queries::documents::get_document_embeddings(&self.db, collection_name).await?;
        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .filter(|(_, embedding)| embedding.len() == collection.embedding_dimensions)
            .map(|(uuid, embedding)| {
                let score =
                    similarity(collection.distance_metric, &query_embedding, &embedding);
                (uuid, embedding, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

        let results: Vec<(String, f32)> = if mmr {
            maximal_marginal_relevance(
                collection.distance_metric,
                ranked,
                limit as usize,
                state.config.search.mmr_lambda,
            )
        } else {
            if limit > 0 {
                ranked.truncate(limit as usize);
            }
            ranked
                .into_iter()
                .map(|(uuid, _, score)| (uuid, score))
                .collect()
        };

        let total_count = results.len();
        let page_items = paginate(&results, page_number, page_size);

        // Fetch full documents for the page and attach scores in rank order.
        let uuids: Vec<String> = page_items.iter().map(|(uuid, _)| uuid.clone()).collect();
        let fetched =
            queries::documents::get_documents(&self.db, collection_name, uuids).await?;
        let mut by_uuid: HashMap<String, _> = fetched
            .into_iter()
            .map(|d| (d.uuid.clone(), d))
            .collect();
        let documents = page_items
            .iter()
            .filter_map(|(uuid, score)| {
                by_uuid.remove(uuid).map(|mut doc| {
                    doc.score = Some(*score);
                    doc
                })
            })
            .collect();

        metrics::histogram!("engram_search_latency_seconds")
            .record(started.elapsed().as_secs_f64());
        debug!(
            collection = collection_name,
            total = total_count,
            page = page_number,
            mmr,
            "search complete"
        );

        Ok(DocumentSearchResultPage {
            documents,
            page_number,
            page_size,
            total_count,
        })
    }
}

/// The query vector: an explicit embedding wins; otherwise the text is
/// embedded through the provider on the app state.
async fn resolve_query_embedding(
    state: &AppState,
    query: &DocumentQuery,
) -> Result<Vec<f32>, EngramError> {
    if let Some(embedding) = &query.embedding {
        return Ok(embedding.clone());
    }
    let text = match &query.text {
        Some(text) if !text.is_empty() => text.clone(),
        _ => {
            return Err(EngramError::Validation(
                "query must carry text or an embedding".to_string(),
            ))
        }
    };

    let output = state
        .embedder
        .embed(EmbeddingInput { texts: vec![text] })
        .await?;
    output
        .embeddings
        .into_iter()
        .next()
        .ok_or_else(|| EngramError::Internal("embedding provider returned no results".to_string()))
}

/// Slice the ranked sequence into the requested page.
fn paginate(results: &[(String, f32)], page_number: i64, page_size: i64) -> &[(String, f32)] {
    if page_size == -1 {
        // Everything lands on page 1; later pages are empty by definition.
        return if page_number == 1 { results } else { &[] };
    }
    let start = (page_number - 1).saturating_mul(page_size) as usize;
    if start >= results.len() {
        return &[];
    }
    let end = (start + page_size as usize).min(results.len());
    &results[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(n: usize) -> Vec<(String, f32)> {
        (0..n)
            .map(|i| (format!("d{i}"), 1.0 - i as f32 / n as f32))
            .collect()
    }

    #[test]
    fn paginate_slices_in_order() {
        let results = ranked(5);
        assert_eq!(paginate(&results, 1, 2).len(), 2);
        assert_eq!(paginate(&results, 1, 2)[0].0, "d0");
        assert_eq!(paginate(&results, 2, 2)[0].0, "d2");
        assert_eq!(paginate(&results, 3, 2).len(), 1);
        assert_eq!(paginate(&results, 3, 2)[0].0, "d4");
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let results = ranked(3);
        assert!(paginate(&results, 4, 2).is_empty());
        assert!(paginate(&results, 100, 2).is_empty());
    }

    #[test]
    fn paginate_minus_one_returns_everything_on_page_one() {
        let results = ranked(7);
        assert_eq!(paginate(&results, 1, -1).len(), 7);
        assert!(paginate(&results, 2, -1).is_empty());
    }

    #[test]
    fn pages_are_total_and_non_overlapping() {
        let results = ranked(10);
        let page_size = 3;
        let mut reassembled = Vec::new();
        for page in 1..=4 {
            reassembled.extend_from_slice(paginate(&results, page, page_size));
        }
        assert_eq!(reassembled, results);
    }
}

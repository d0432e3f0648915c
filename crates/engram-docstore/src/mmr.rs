// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maximal Marginal Relevance re-ranking.
//!
//! Greedy selection balancing query relevance against redundancy with the
//! already-selected set:
//!
//! `score(d) = lambda * sim(d, query) - (1 - lambda) * max_{s in selected} sim(d, s)`
//!
//! The first pick has no redundancy term. lambda -> 1 degenerates to the
//! base similarity order; lambda -> 0 to pure diversity.

use engram_core::types::DistanceMetric;
use engram_core::vector::similarity;

/// A ranking candidate: uuid, embedding, and similarity to the query.
pub type RankedCandidate = (String, Vec<f32>, f32);

/// Re-rank `candidates` (base-ranked, most similar first), selecting up to
/// `limit` documents. `limit == 0` selects everything, reordered.
///
/// Returns `(uuid, query_similarity)` pairs in selection order. Each input
/// appears at most once, so the output never contains duplicates.
pub fn maximal_marginal_relevance(
    metric: DistanceMetric,
    mut remaining: Vec<RankedCandidate>,
    limit: usize,
    lambda: f32,
) -> Vec<(String, f32)> {
    let lambda = lambda.clamp(0.0, 1.0);
    let k = if limit == 0 {
        remaining.len()
    } else {
        limit.min(remaining.len())
    };

    let mut selected: Vec<RankedCandidate> = Vec::with_capacity(k);
    while selected.len() < k && !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_score = f32::NEG_INFINITY;
        for (i, (_, embedding, query_sim)) in remaining.iter().enumerate() {
            let redundancy = if selected.is_empty() {
                0.0
            } else {
                selected
                    .iter()
                    .map(|(_, s_emb, _)| similarity(metric, embedding, s_emb))
                    .fold(f32::NEG_INFINITY, f32::max)
            };
            let score = lambda * query_sim - (1.0 - lambda) * redundancy;
            // Ties keep the earlier (better base-ranked) candidate.
            if score > best_score {
                best_score = score;
                best_idx = i;
            }
        }
        selected.push(remaining.remove(best_idx));
    }

    selected
        .into_iter()
        .map(|(uuid, _, query_sim)| (uuid, query_sim))
        .collect()
}

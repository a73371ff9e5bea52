// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-K similarity ranking over normalized names.
//!
//! Scores are a symmetric edit-distance ratio on a 0-100 scale. The ranking
//! is stable: candidates with equal scores keep their input order.

use tracing::trace;

/// One ranked candidate: its position in the input slice and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub index: usize,
    pub score: f64,
}

/// Ranks candidate names against a query.
pub trait SimilarityScorer: Send + Sync {
    /// Return at most `k` candidates, best first, ties in input order.
    fn top_k(&self, query: &str, candidates: &[String], k: usize) -> Vec<ScoredCandidate>;
}

/// Edit-distance ratio: `100 * (1 - levenshtein / max_len)`.
///
/// Identical strings (including two empty strings) score 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Best score `ratio` could return for strings of these character lengths.
///
/// The edit distance is at least the length difference.
fn ratio_upper_bound(len_a: usize, len_b: usize) -> f64 {
    let longest = len_a.max(len_b);
    if longest == 0 {
        return 100.0;
    }
    len_a.min(len_b) as f64 / longest as f64 * 100.0
}

/// Default scorer backed by [`ratio`].
///
/// Keeps a sorted window of the best `k` scores and skips the full edit
/// distance for any candidate whose length bound cannot beat the current
/// k-th best.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditRatioScorer;

impl SimilarityScorer for EditRatioScorer {
    fn top_k(&self, query: &str, candidates: &[String], k: usize) -> Vec<ScoredCandidate> {
        if k == 0 {
            return Vec::new();
        }

        let query_len = query.chars().count();
        let mut best: Vec<ScoredCandidate> = Vec::with_capacity(k + 1);
        let mut pruned = 0usize;

        for (index, candidate) in candidates.iter().enumerate() {
            if best.len() == k {
                let floor = best[k - 1].score;
                if ratio_upper_bound(query_len, candidate.chars().count()) < floor {
                    pruned += 1;
                    continue;
                }
            }

            let score = ratio(query, candidate);
            // Insert after every entry with an equal or higher score.
            let pos = best.partition_point(|c| c.score >= score);
            if pos < k {
                best.insert(pos, ScoredCandidate { index, score });
                best.truncate(k);
            }
        }

        trace!(
            query,
            candidates = candidates.len(),
            pruned,
            "similarity ranking complete"
        );
        best
    }
}

//! Candidate scoring and selection.
//!
//! Resolves the engine's approximate textual recommendation into one
//! concrete catalog entry. Scoring is case-insensitive and deterministic:
//! exact match 1.0, substring containment 0.8, otherwise the fraction of
//! the recommended title's words found in the candidate name. Selection is
//! first-wins: a later candidate replaces the current best only with a
//! strictly greater score.

use std::collections::HashSet;

use crate::error::ApiError;
use crate::types::{Candidate, MatchDecision};

/// Similarity between the recommended title and one candidate name.
pub fn score(recommended: &str, candidate_name: &str) -> f64 {
    let recommended = recommended.to_lowercase();
    let candidate = candidate_name.to_lowercase();

    if recommended == candidate {
        return 1.0;
    }
    if recommended.contains(&candidate) || candidate.contains(&recommended) {
        return 0.8;
    }

    let recommended_words: HashSet<&str> = recommended.split_whitespace().collect();
    let candidate_words: HashSet<&str> = candidate.split_whitespace().collect();
    let common = recommended_words.intersection(&candidate_words).count();

    // asymmetric containment ratio, denominated in the recommendation
    common as f64 / recommended_words.len().max(1) as f64
}

/// Picks the best candidate for a recommended title.
///
/// Candidates are visited in the order supplied; ties keep the
/// earlier-seen candidate. A non-empty list always yields a decision, even
/// when the best score is 0.
pub fn select(recommended: &str, candidates: &[Candidate]) -> Result<MatchDecision, ApiError> {
    let mut best: Option<(usize, f64)> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let candidate_score = score(recommended, &candidate.display_name);
        match best {
            Some((_, best_score)) if candidate_score <= best_score => {}
            _ => best = Some((index, candidate_score)),
        }
    }

    match best {
        Some((index, best_score)) => Ok(MatchDecision {
            candidate: candidates[index].clone(),
            score: best_score,
        }),
        None => Err(ApiError::NoCandidates),
    }
}

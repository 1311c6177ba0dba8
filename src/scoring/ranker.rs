//! Deterministic ordering of scored concepts

use std::cmp::Ordering;

use crate::types::ScoredConcept;

/// Ranking order: fused score descending, asserted before inferred,
/// then concept id ascending. `-0.0` and `0.0` compare equal.
pub fn compare_scored(a: &ScoredConcept, b: &ScoredConcept) -> Ordering {
    // adding 0.0 maps -0.0 to 0.0
    (b.score + 0.0)
        .total_cmp(&(a.score + 0.0))
        .then_with(|| a.provenance.cmp(&b.provenance))
        .then_with(|| a.concept_id.cmp(&b.concept_id))
}

/// Sort `scored` into ranking order and keep at most `top_k` entries
pub fn rank(mut scored: Vec<ScoredConcept>, top_k: Option<usize>) -> Vec<ScoredConcept> {
    scored.sort_by(compare_scored);
    if let Some(k) = top_k {
        scored.truncate(k);
    }
    scored
}

/// Ranker with a configured cut-off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ranker {
    top_k: Option<usize>,
}

impl Ranker {
    pub fn new(top_k: Option<usize>) -> Self {
        Self { top_k }
    }

    pub fn top_k(&self) -> Option<usize> {
        self.top_k
    }

    pub fn rank(&self, scored: Vec<ScoredConcept>) -> Vec<ScoredConcept> {
        rank(scored, self.top_k)
    }
}

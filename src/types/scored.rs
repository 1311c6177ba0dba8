//! Scored concept types produced by fusion and ranking

use serde::{Deserialize, Serialize};

use super::Provenance;

/// A concept with its fused ranking score and supporting evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredConcept {
    #[serde(rename = "conceptId")]
    pub concept_id: String,
    /// relevance × structural confidence
    pub score: f64,
    /// Oracle relevance, after logistic normalisation when enabled
    pub relevance: f64,
    /// Inference depth the structural confidence was computed from
    pub depth: u32,
    pub provenance: Provenance,
    #[serde(rename = "ruleName", default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl ScoredConcept {
    /// Convenience constructor for an asserted concept
    pub fn asserted(concept_id: &str, score: f64) -> Self {
        Self {
            concept_id: concept_id.to_string(),
            score,
            relevance: score,
            depth: 0,
            provenance: Provenance::Asserted,
            rule: None,
        }
    }

    /// Convenience constructor for an inferred concept
    pub fn inferred(concept_id: &str, score: f64, depth: u32, rule: &str) -> Self {
        Self {
            concept_id: concept_id.to_string(),
            score,
            relevance: score,
            depth,
            provenance: Provenance::Inferred,
            rule: Some(rule.to_string()),
        }
    }
}

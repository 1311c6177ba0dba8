//! Relevance × structural confidence fusion

use tracing::trace;

use crate::error::{ReasonerError, ReasonerResult};
use crate::relation_graph::RelationGraph;
use crate::types::{Provenance, ScoredConcept};

/// Depth decay used when none is configured
pub const DEFAULT_DEPTH_DECAY: f64 = 0.8;

/// Check that a depth decay lies in (0, 1]
pub fn validate_depth_decay(depth_decay: f64) -> ReasonerResult<()> {
    if depth_decay.is_finite() && depth_decay > 0.0 && depth_decay <= 1.0 {
        Ok(())
    } else {
        Err(ReasonerError::Configuration(format!(
            "depth decay must be in (0, 1], got {}",
            depth_decay
        )))
    }
}

/// Fused score of one concept: `relevance * depth_decay ^ depth`
pub fn fuse(
    concept_id: &str,
    relevance: f64,
    graph: &RelationGraph,
    depth_decay: f64,
) -> ReasonerResult<f64> {
    ScoreFuser::new(depth_decay)?.fuse(concept_id, relevance, graph)
}

/// Combines oracle relevance with inference-depth confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreFuser {
    depth_decay: f64,
}

impl ScoreFuser {
    pub fn new(depth_decay: f64) -> ReasonerResult<Self> {
        validate_depth_decay(depth_decay)?;
        Ok(Self { depth_decay })
    }

    pub fn depth_decay(&self) -> f64 {
        self.depth_decay
    }

    /// `depth_decay ^ depth`; 1.0 for asserted concepts
    pub fn structural_confidence(&self, depth: u32) -> f64 {
        self.depth_decay.powi(i32::try_from(depth).unwrap_or(i32::MAX))
    }

    pub fn fuse(
        &self,
        concept_id: &str,
        relevance: f64,
        graph: &RelationGraph,
    ) -> ReasonerResult<f64> {
        Ok(self.score(concept_id, relevance, graph)?.score)
    }

    /// Fused score with its supporting evidence, taking the depth from the
    /// concept's shallowest derivation in `graph`
    pub fn score(
        &self,
        concept_id: &str,
        relevance: f64,
        graph: &RelationGraph,
    ) -> ReasonerResult<ScoredConcept> {
        let (depth, rule) = graph.structural_depth(concept_id).ok_or_else(|| {
            ReasonerError::Scoring(format!("concept '{}' is not in the graph", concept_id))
        })?;
        self.score_at_depth(concept_id, relevance, depth, rule)
    }

    /// Fused score for relevance observed on evidence of a known depth,
    /// such as a single relation passage
    pub fn score_at_depth(
        &self,
        concept_id: &str,
        relevance: f64,
        depth: u32,
        rule: Option<&str>,
    ) -> ReasonerResult<ScoredConcept> {
        if !relevance.is_finite() {
            return Err(ReasonerError::Scoring(format!(
                "relevance for '{}' is not finite: {}",
                concept_id, relevance
            )));
        }

        let confidence = self.structural_confidence(depth);
        let score = relevance * confidence;
        trace!(concept = concept_id, relevance, depth, confidence, score, "fused score");

        Ok(ScoredConcept {
            concept_id: concept_id.to_string(),
            score,
            relevance,
            depth,
            provenance: if depth == 0 {
                Provenance::Asserted
            } else {
                Provenance::Inferred
            },
            rule: if depth == 0 { None } else { rule.map(str::to_string) },
        })
    }

    /// Score every `(concept id, relevance)` pair, failing on the first error
    pub fn score_all<'a, I>(
        &self,
        relevance: I,
        graph: &RelationGraph,
    ) -> ReasonerResult<Vec<ScoredConcept>>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        relevance
            .into_iter()
            .map(|(concept_id, score)| self.score(concept_id, score, graph))
            .collect()
    }
}

impl Default for ScoreFuser {
    fn default() -> Self {
        Self {
            depth_decay: DEFAULT_DEPTH_DECAY,
        }
    }
}

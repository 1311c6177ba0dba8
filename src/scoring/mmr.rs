//! Maximal marginal relevance reranking
//!
//! Starts from the passage most similar to the query, then repeatedly adds
//! the passage with the best trade-off between query similarity and its
//! average similarity to the passages already picked. The redundancy weight
//! grows with every pick.

use tracing::trace;

use crate::collaborators::SimilarityOracle;
use crate::error::{ReasonerError, ReasonerResult};

pub const DEFAULT_REDUNDANCY_WEIGHT: f64 = 0.1;
/// Added to the redundancy weight per passage already selected
pub const DEFAULT_REDUNDANCY_STEP: f64 = 0.01;
pub const DEFAULT_SELECTION_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MmrReranker {
    redundancy_weight: f64,
    redundancy_step: f64,
    selection_limit: usize,
}

impl MmrReranker {
    pub fn new(
        redundancy_weight: f64,
        redundancy_step: f64,
        selection_limit: usize,
    ) -> ReasonerResult<Self> {
        for (name, value) in [
            ("redundancy weight", redundancy_weight),
            ("redundancy step", redundancy_step),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ReasonerError::Configuration(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if selection_limit == 0 {
            return Err(ReasonerError::Configuration(
                "selection limit must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            redundancy_weight,
            redundancy_step,
            selection_limit,
        })
    }

    /// Indices into `passages` in selection order, at most `selection_limit`
    /// of them, cut to `top_k`. Ties go to the earlier passage.
    pub fn rerank<S>(
        &self,
        query: &str,
        passages: &[String],
        similarity: &S,
        top_k: Option<usize>,
    ) -> ReasonerResult<Vec<usize>>
    where
        S: SimilarityOracle + ?Sized,
    {
        let measure = |a: &str, b: &str| -> ReasonerResult<f64> {
            let value = similarity.similarity(a, b);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(ReasonerError::Scoring(format!(
                    "similarity between '{}' and '{}' is not finite: {}",
                    a, b, value
                )))
            }
        };

        let to_query = passages
            .iter()
            .map(|passage| measure(query, passage))
            .collect::<ReasonerResult<Vec<f64>>>()?;

        let limit = self.selection_limit.min(passages.len());
        let mut selected: Vec<usize> = Vec::with_capacity(limit);
        let mut picked = vec![false; passages.len()];
        // running sum of similarity to the selected passages
        let mut redundancy = vec![0.0; passages.len()];

        while selected.len() < limit {
            let weight = self.redundancy_weight + self.redundancy_step * selected.len() as f64;
            let mut best: Option<(usize, f64)> = None;

            for (i, relevance) in to_query.iter().enumerate() {
                if picked[i] {
                    continue;
                }
                let value = if selected.is_empty() {
                    *relevance
                } else {
                    relevance - weight * redundancy[i] / selected.len() as f64
                };
                if best.map_or(true, |(_, top)| value > top) {
                    best = Some((i, value));
                }
            }

            let Some((choice, value)) = best else {
                break;
            };
            trace!(passage = choice, value, "mmr pick");
            picked[choice] = true;
            selected.push(choice);

            for (i, total) in redundancy.iter_mut().enumerate() {
                if !picked[i] {
                    *total += measure(&passages[choice], &passages[i])?;
                }
            }
        }

        if let Some(k) = top_k {
            selected.truncate(k);
        }
        Ok(selected)
    }
}

impl Default for MmrReranker {
    fn default() -> Self {
        Self {
            redundancy_weight: DEFAULT_REDUNDANCY_WEIGHT,
            redundancy_step: DEFAULT_REDUNDANCY_STEP,
            selection_limit: DEFAULT_SELECTION_LIMIT,
        }
    }
}

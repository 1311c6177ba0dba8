//! Personalized PageRank over the relation graph
//!
//! Edges are the distinct `(source, target)` pairs of the graph's relations,
//! so parallel relations between two concepts count once. Teleport mass
//! follows the personalization vector, and so does the mass held by
//! concepts without outgoing relations.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::error::{ReasonerError, ReasonerResult};
use crate::relation_graph::RelationGraph;

/// Probability of following a relation rather than teleporting
pub const DEFAULT_ALPHA: f64 = 0.85;
pub const DEFAULT_PAGERANK_ITERATIONS: usize = 100;
/// Convergence threshold per concept, summed over the graph
pub const DEFAULT_TOLERANCE: f64 = 1.0e-6;
/// Personalization of seed concepts
pub const SEED_WEIGHT: f64 = 1.0;
/// Personalization of concepts without observed relevance
pub const DEFAULT_WEIGHT: f64 = 0.1;

/// Build a personalization vector over every concept in `graph`: seeds get
/// `SEED_WEIGHT`, other concepts their entry in `relevance` or
/// `DEFAULT_WEIGHT`
pub fn personalization(
    graph: &RelationGraph,
    seeds: &BTreeSet<String>,
    relevance: &BTreeMap<String, f64>,
) -> BTreeMap<String, f64> {
    graph
        .concepts()
        .map(|concept| {
            let weight = if seeds.contains(&concept.id) {
                SEED_WEIGHT
            } else {
                relevance.get(&concept.id).copied().unwrap_or(DEFAULT_WEIGHT)
            };
            (concept.id.clone(), weight)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonalizedPageRank {
    alpha: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl PersonalizedPageRank {
    pub fn new(alpha: f64, max_iterations: usize) -> ReasonerResult<Self> {
        if !(alpha.is_finite() && alpha > 0.0 && alpha < 1.0) {
            return Err(ReasonerError::Configuration(format!(
                "pagerank alpha must be in (0, 1), got {}",
                alpha
            )));
        }
        if max_iterations == 0 {
            return Err(ReasonerError::Configuration(
                "pagerank needs at least one iteration".to_string(),
            ));
        }
        Ok(Self {
            alpha,
            max_iterations,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Stationary score of every concept in `graph`. Scores sum to 1.
    ///
    /// Weights must be finite and non-negative with a positive total over
    /// the graph's concepts; entries for unknown concepts are ignored.
    /// When the iteration budget runs out the last iterate is returned.
    pub fn scores(
        &self,
        graph: &RelationGraph,
        personalization: &BTreeMap<String, f64>,
    ) -> ReasonerResult<BTreeMap<String, f64>> {
        let ids: Vec<&str> = graph.concepts().map(|concept| concept.id.as_str()).collect();
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }
        let index: BTreeMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        for (id, weight) in personalization {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ReasonerError::Scoring(format!(
                    "personalization for '{}' must be finite and non-negative, got {}",
                    id, weight
                )));
            }
        }
        let mut teleport: Vec<f64> = ids
            .iter()
            .map(|id| personalization.get(*id).copied().unwrap_or(0.0))
            .collect();
        let mass: f64 = teleport.iter().sum();
        if mass <= 0.0 {
            return Err(ReasonerError::Scoring(
                "personalization has no weight on any graph concept".to_string(),
            ));
        }
        teleport.iter_mut().for_each(|w| *w /= mass);

        let mut targets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); ids.len()];
        for relation in graph.relations() {
            if let (Some(&from), Some(&to)) =
                (index.get(relation.source.as_str()), index.get(relation.target.as_str()))
            {
                targets[from].insert(to);
            }
        }

        let n = ids.len() as f64;
        let mut rank = vec![1.0 / n; ids.len()];
        let mut converged = false;

        for iteration in 0..self.max_iterations {
            let previous = rank;
            rank = vec![0.0; ids.len()];

            let dangling: f64 = previous
                .iter()
                .zip(&targets)
                .filter(|(_, out)| out.is_empty())
                .map(|(mass, _)| mass)
                .sum();

            for (from, out) in targets.iter().enumerate() {
                if out.is_empty() {
                    continue;
                }
                let share = self.alpha * previous[from] / out.len() as f64;
                for &to in out {
                    rank[to] += share;
                }
            }
            for (value, weight) in rank.iter_mut().zip(&teleport) {
                *value += (self.alpha * dangling + (1.0 - self.alpha)) * weight;
            }

            let delta: f64 = rank.iter().zip(&previous).map(|(a, b)| (a - b).abs()).sum();
            if delta < n * self.tolerance {
                debug!(iterations = iteration + 1, concepts = ids.len(), "pagerank converged");
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                iterations = self.max_iterations,
                concepts = ids.len(),
                "pagerank stopped before converging"
            );
        }

        Ok(ids
            .into_iter()
            .map(str::to_string)
            .zip(rank)
            .collect())
    }

    /// Concepts by descending score, ties by id, cut to `top_k`
    pub fn rank(
        &self,
        graph: &RelationGraph,
        personalization: &BTreeMap<String, f64>,
        top_k: Option<usize>,
    ) -> ReasonerResult<Vec<(String, f64)>> {
        let mut ranked: Vec<(String, f64)> =
            self.scores(graph, personalization)?.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(k) = top_k {
            ranked.truncate(k);
        }
        Ok(ranked)
    }
}

impl Default for PersonalizedPageRank {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            max_iterations: DEFAULT_PAGERANK_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

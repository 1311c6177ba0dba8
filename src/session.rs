//! Per-query reasoning pipeline
//!
//! A `ReasoningSession` owns one `RelationGraph` for one query and drives it
//! through seed → expand → score → rank. Sessions share nothing; `run_batch`
//! processes independent queries in parallel.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::collaborators::{RelevanceOracle, SimilarityOracle, TerminologySource};
use crate::config::ReasonerConfig;
use crate::error::{ReasonerError, ReasonerResult};
use crate::inference::RuleEngine;
use crate::relation_graph::RelationGraph;
use crate::scoring::{logistic, personalization, MmrReranker, PersonalizedPageRank, Ranker, ScoreFuser};
use crate::search::find_concepts;
use crate::types::{ConceptRecord, ExpansionReport, Provenance, RelationChange, ScoredConcept};
use crate::validation::{validate_identifier, validate_triple_record};

/// Ranked answer for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub query: String,
    pub ranked: Vec<ScoredConcept>,
    /// Absent when the session ran without rules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ExpansionReport>,
}

/// Text sent to the relevance oracle, with the depth of the relation it
/// describes
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    pub text: String,
    pub depth: u32,
    pub rule: Option<String>,
}

pub struct ReasoningSession {
    query: String,
    config: ReasonerConfig,
    engine: Option<RuleEngine>,
    fuser: ScoreFuser,
    graph: RelationGraph,
    seeds: BTreeSet<String>,
    report: Option<ExpansionReport>,
}

impl ReasoningSession {
    /// Validate `config`, build its rules and open an empty session
    pub fn new(query: &str, config: ReasonerConfig) -> ReasonerResult<Self> {
        let query = validate_identifier("query", query)?.to_string();
        config.validate()?;

        let engine = if config.rules.is_empty() {
            None
        } else {
            Some(config.rule_engine()?)
        };
        let fuser = ScoreFuser::new(config.depth_decay)?;

        Ok(Self {
            query,
            config,
            engine,
            fuser,
            graph: RelationGraph::new(),
            seeds: BTreeSet::new(),
            report: None,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn config(&self) -> &ReasonerConfig {
        &self.config
    }

    pub fn graph(&self) -> &RelationGraph {
        &self.graph
    }

    /// Direct access for callers that populate the graph themselves
    pub fn graph_mut(&mut self) -> &mut RelationGraph {
        &mut self.graph
    }

    pub fn seeds(&self) -> impl Iterator<Item = &str> + '_ {
        self.seeds.iter().map(String::as_str)
    }

    pub fn report(&self) -> Option<&ExpansionReport> {
        self.report.as_ref()
    }

    /// Pull `ids` and their one-hop relations from `source` as asserted
    /// facts. Returns the number of relations added or upgraded.
    ///
    /// Every seed is fetched and checked before the graph changes; on error
    /// the session is left as it was.
    pub fn seed<S>(&mut self, source: &S, ids: &[&str]) -> ReasonerResult<usize>
    where
        S: TerminologySource + ?Sized,
    {
        let mut fetched = Vec::with_capacity(ids.len());
        for id in ids {
            let id = validate_identifier("seed concept id", id)?;
            let record = source.concept(id);
            if let Some(record) = &record {
                validate_identifier("concept id", &record.id)?;
            }
            let triples = source.relations(id);
            for triple in &triples {
                validate_triple_record(triple)?;
            }
            fetched.push((id, record, triples));
        }

        let mut changed = 0;
        for (id, record, triples) in fetched {
            match record {
                Some(record) => self.register(record)?,
                None => warn!(concept = id, "seed concept unknown to terminology source"),
            }
            self.seeds.insert(id.to_string());

            for triple in triples {
                let change = self.graph.add_relation(
                    &triple.source_id,
                    &triple.relation_type,
                    &triple.target_id,
                    Provenance::Asserted,
                    0,
                )?;
                if change != RelationChange::Unchanged {
                    changed += 1;
                }

                let neighbour = if triple.source_id.trim() == id {
                    triple.target_id.trim()
                } else {
                    triple.source_id.trim()
                };
                let needs_details = self
                    .graph
                    .concept(neighbour)
                    .map_or(true, |concept| concept.placeholder);
                if needs_details {
                    // records with a blank id are skipped, the neighbour stays a placeholder
                    if let Some(record) = source
                        .concept(neighbour)
                        .filter(|record| !record.id.trim().is_empty())
                    {
                        self.register(record)?;
                    }
                }
            }
        }

        debug!(
            query = %self.query,
            seeds = self.seeds.len(),
            concepts = self.graph.concept_count(),
            relations = self.graph.relation_count(),
            "session seeded"
        );
        Ok(changed)
    }

    fn register(&mut self, record: ConceptRecord) -> ReasonerResult<()> {
        self.graph
            .add_concept(&record.id, &record.name, record.synonyms, record.semantic_type)?;
        Ok(())
    }

    /// Map recognized entity mentions to concept ids already in the graph,
    /// keeping the best match per mention
    pub fn resolve_mentions(&self, mentions: &[&str]) -> Vec<String> {
        let mut resolved = Vec::new();
        for mention in mentions {
            if let Some(best) = find_concepts(&self.graph, mention, Some(1)).into_iter().next() {
                if !resolved.contains(&best.concept_id) {
                    resolved.push(best.concept_id);
                }
            }
        }
        resolved
    }

    /// Run the configured rules over the graph, then check its invariants.
    /// Without rules the graph is left as seeded.
    pub fn expand(&mut self) -> ReasonerResult<Option<&ExpansionReport>> {
        let Some(engine) = &self.engine else {
            debug!(query = %self.query, "no rules configured, skipping expansion");
            return Ok(None);
        };

        let report = engine.expand(&mut self.graph)?;
        self.graph.verify_integrity()?;
        self.report = Some(report);
        Ok(self.report.as_ref())
    }

    /// Concept ids eligible as answers: everything except the seeds
    pub fn candidates(&self) -> Vec<&str> {
        self.graph
            .concepts()
            .map(|concept| concept.id.as_str())
            .filter(|id| !self.seeds.contains(*id))
            .collect()
    }

    /// Trim `text`, drop it when blank and cut it to `max_passage_chars`
    fn clip(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let clipped = match text.char_indices().nth(self.config.max_passage_chars) {
            Some((end, _)) => text[..end].trim_end(),
            None => text,
        };
        Some(clipped.to_string())
    }

    /// Evidence scored against the query for one concept: one passage per
    /// incident relation, or the concept name when none is usable
    pub fn evidence(&self, concept_id: &str) -> Vec<Passage> {
        let mut evidence: Vec<Passage> = self
            .graph
            .relations_from(concept_id, None)
            .chain(self.graph.relations_to(concept_id, None))
            .filter_map(|relation| {
                self.clip(&self.graph.describe(relation)).map(|text| Passage {
                    text,
                    depth: relation.depth,
                    rule: relation.rule.clone(),
                })
            })
            .collect();

        if evidence.is_empty() {
            let concept = self.graph.concept(concept_id);
            let depth = self.graph.structural_depth(concept_id);
            if let (Some(concept), Some((depth, rule))) = (concept, depth) {
                if let Some(text) = self.clip(concept.display_name()) {
                    evidence.push(Passage {
                        text,
                        depth,
                        rule: rule.map(str::to_string),
                    });
                }
            }
        }
        evidence
    }

    /// Texts of `evidence`
    pub fn passages(&self, concept_id: &str) -> Vec<String> {
        self.evidence(concept_id)
            .into_iter()
            .map(|passage| passage.text)
            .collect()
    }

    /// Score every candidate with `oracle`. Each passage is fused with the
    /// depth of its own relation, and a concept keeps its best passage as
    /// evidence.
    pub fn score_with<O>(&self, oracle: &O) -> ReasonerResult<Vec<ScoredConcept>>
    where
        O: RelevanceOracle + ?Sized,
    {
        let mut scored = Vec::new();
        for concept_id in self.candidates() {
            let mut best: Option<ScoredConcept> = None;
            for passage in self.evidence(concept_id) {
                let raw = oracle.score(&self.query, &passage.text);
                if !raw.is_finite() {
                    return Err(ReasonerError::Scoring(format!(
                        "oracle score for '{}' is not finite: {}",
                        passage.text, raw
                    )));
                }
                let relevance = if self.config.normalize_relevance {
                    logistic(raw)
                } else {
                    raw
                };
                let candidate = self.fuser.score_at_depth(
                    concept_id,
                    relevance,
                    passage.depth,
                    passage.rule.as_deref(),
                )?;
                best = match best {
                    Some(current) if stronger(&candidate, &current) != Ordering::Greater => {
                        Some(current)
                    }
                    _ => Some(candidate),
                };
            }
            scored.extend(best);
        }
        Ok(scored)
    }

    /// Fuse externally computed relevance with structural confidence
    pub fn score_relevance<'a, I>(&self, relevance: I) -> ReasonerResult<Vec<ScoredConcept>>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        self.fuser.score_all(relevance, &self.graph)
    }

    /// Score with `oracle` and rank with the configured `top_k`
    pub fn answer<O>(&self, oracle: &O) -> ReasonerResult<Answer>
    where
        O: RelevanceOracle + ?Sized,
    {
        let scored = self.score_with(oracle)?;
        let ranked = Ranker::new(self.config.top_k).rank(scored);

        info!(
            query = %self.query,
            candidates = self.candidates().len(),
            returned = ranked.len(),
            "session answered"
        );
        Ok(Answer {
            query: self.query.clone(),
            ranked,
            report: self.report.clone(),
        })
    }

    /// Rank candidates by personalized PageRank over the graph. Seeds and
    /// each candidate's fused score (floored at 0) personalize the walk;
    /// the returned `score` is the PageRank score, the other fields keep
    /// the fused evidence.
    pub fn rank_by_pagerank<O>(
        &self,
        oracle: &O,
        pagerank: &PersonalizedPageRank,
    ) -> ReasonerResult<Vec<ScoredConcept>>
    where
        O: RelevanceOracle + ?Sized,
    {
        let fused = self.score_with(oracle)?;
        let relevance: BTreeMap<String, f64> = fused
            .iter()
            .map(|scored| (scored.concept_id.clone(), scored.score.max(0.0)))
            .collect();
        let weights = personalization(&self.graph, &self.seeds, &relevance);
        let scores = pagerank.scores(&self.graph, &weights)?;

        let ranked = fused
            .into_iter()
            .map(|mut scored| {
                scored.score = scores.get(&scored.concept_id).copied().unwrap_or(0.0);
                scored
            })
            .collect();
        Ok(Ranker::new(self.config.top_k).rank(ranked))
    }

    /// Relation passages of the whole graph picked for query relevance and
    /// mutual diversity, in selection order
    pub fn diverse_passages<S>(
        &self,
        similarity: &S,
        reranker: &MmrReranker,
        top_k: Option<usize>,
    ) -> ReasonerResult<Vec<String>>
    where
        S: SimilarityOracle + ?Sized,
    {
        let mut passages: Vec<String> = self
            .graph
            .relations()
            .iter()
            .filter_map(|relation| self.clip(&self.graph.describe(relation)))
            .collect();
        let order = reranker.rerank(&self.query, &passages, similarity, top_k)?;

        let mut picked = Vec::with_capacity(order.len());
        for index in order {
            picked.push(std::mem::take(&mut passages[index]));
        }
        Ok(picked)
    }
}

/// Which of two evidence scores for the same concept is stronger: higher
/// score, then shallower depth, then rule name
fn stronger(a: &ScoredConcept, b: &ScoredConcept) -> Ordering {
    (a.score + 0.0)
        .total_cmp(&(b.score + 0.0))
        .then_with(|| b.depth.cmp(&a.depth))
        .then_with(|| b.rule.cmp(&a.rule))
}

/// One query of a batch with the concept ids to seed it from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryInput {
    pub query: String,
    pub seeds: Vec<String>,
}

impl QueryInput {
    pub fn new(query: &str, seeds: &[&str]) -> Self {
        Self {
            query: query.to_string(),
            seeds: seeds.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Run one full session: seed, expand, answer
pub fn run_query<S, O>(
    input: &QueryInput,
    source: &S,
    oracle: &O,
    config: &ReasonerConfig,
) -> ReasonerResult<Answer>
where
    S: TerminologySource + ?Sized,
    O: RelevanceOracle + ?Sized,
{
    let mut session = ReasoningSession::new(&input.query, config.clone())?;
    let seeds: Vec<&str> = input.seeds.iter().map(String::as_str).collect();
    session.seed(source, &seeds)?;
    session.expand()?;
    session.answer(oracle)
}

/// Answer independent queries in parallel; results keep input order
pub fn run_batch<S, O>(
    inputs: &[QueryInput],
    source: &S,
    oracle: &O,
    config: &ReasonerConfig,
) -> ReasonerResult<Vec<ReasonerResult<Answer>>>
where
    S: TerminologySource + Sync + ?Sized,
    O: RelevanceOracle + Sync + ?Sized,
{
    config.validate()?;
    if inputs.is_empty() {
        return Err(ReasonerError::Validation("batch must contain at least one query".to_string()));
    }

    let start_time = Instant::now();
    let answers: Vec<ReasonerResult<Answer>> = inputs
        .par_iter()
        .map(|input| run_query(input, source, oracle, config))
        .collect();

    let failed = answers.iter().filter(|a| a.is_err()).count();
    info!(
        queries = inputs.len(),
        failed,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "batch complete"
    );
    Ok(answers)
}

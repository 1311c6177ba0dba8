//! Inference Engine for Relation Graph Expansion
//!
//! Rules are applied breadth-first: every rule reads the graph as it stood at
//! the start of an iteration, and the union of their derivations is inserted
//! only after all rules have run. Relations derived in iteration k are first
//! visible in iteration k + 1, so rule order never changes the result.

pub mod catalog;
pub mod rules;

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{ReasonerError, ReasonerResult};
use crate::relation_graph::RelationGraph;
use crate::types::{Derivation, ExpansionReport, Relation, RelationChange, Termination, Triple};

pub use catalog::{clinical_composition_rules, RuleCatalog, RuleSpec};
pub use rules::{CompositionRule, InverseRule, JoinShape, SymmetricRule, TransitiveRule};

/// Iteration budget used when none is configured
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Trait for inference rules
///
/// A rule inspects the graph and proposes relations. It never mutates the
/// graph; the engine decides what gets inserted.
pub trait InferenceRule: Send + Sync {
    /// Get the name of this rule
    fn name(&self) -> &str;

    /// Propose relations derivable from the current graph state
    fn matches(&self, graph: &RelationGraph) -> Vec<Derivation>;
}

/// Apply `rules` to `graph` until fixpoint or until `max_iterations`
/// iterations have run.
///
/// Hitting the budget is not an error; it is reported through
/// `ExpansionReport::terminated_by`.
pub fn apply_rules_to_graph(
    graph: &mut RelationGraph,
    rules: &[Box<dyn InferenceRule>],
    max_iterations: usize,
) -> ReasonerResult<ExpansionReport> {
    if rules.is_empty() {
        return Err(ReasonerError::Configuration(
            "rule set must not be empty".to_string(),
        ));
    }
    if max_iterations == 0 {
        return Err(ReasonerError::Configuration(
            "iteration budget must be positive".to_string(),
        ));
    }

    let start_time = Instant::now();
    let mut report = ExpansionReport::new();

    while report.iterations_run < max_iterations {
        report.iterations_run += 1;

        let candidates = collect_candidates(graph, rules);
        if candidates.is_empty() {
            report.terminated_by = Termination::Fixpoint;
            info!(
                iterations = report.iterations_run,
                added = report.relations_added,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "rule expansion reached fixpoint"
            );
            return Ok(report);
        }

        let added = candidates.len();
        for (triple, derivation) in candidates {
            let relation = Relation::inferred(
                triple,
                derivation.depth,
                derivation.rule_name.clone(),
                derivation.premises,
            );
            let triple = relation.triple();
            if graph.insert_relation(relation) != RelationChange::Added {
                return Err(ReasonerError::Integrity(format!(
                    "derived triple {} was already present",
                    triple
                )));
            }
            *report.added_by_rule.entry(derivation.rule_name).or_default() += 1;
        }
        report.relations_added += added;

        debug!(
            iteration = report.iterations_run,
            added,
            relations = graph.relation_count(),
            "rule iteration complete"
        );
    }

    report.terminated_by = Termination::IterationBudget;
    warn!(
        budget = max_iterations,
        added = report.relations_added,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "rule expansion stopped at iteration budget"
    );
    Ok(report)
}

/// Gather new triples proposed by all rules against one snapshot.
///
/// When several derivations produce the same triple, the shallowest wins;
/// ties go to the smaller rule name, then the smaller premise list.
fn collect_candidates(
    graph: &RelationGraph,
    rules: &[Box<dyn InferenceRule>],
) -> BTreeMap<Triple, Derivation> {
    let mut candidates: BTreeMap<Triple, Derivation> = BTreeMap::new();

    for rule in rules {
        for derivation in rule.matches(graph) {
            if derivation.triple.is_reflexive() || graph.contains_relation(&derivation.triple) {
                continue;
            }
            match candidates.entry(derivation.triple.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(derivation);
                }
                Entry::Occupied(mut entry) => {
                    let current = entry.get();
                    let better = (derivation.depth, &derivation.rule_name, &derivation.premises)
                        < (current.depth, &current.rule_name, &current.premises);
                    if better {
                        entry.insert(derivation);
                    }
                }
            }
        }
    }

    candidates
}

/// The inference engine that holds a rule set and an iteration budget
pub struct RuleEngine {
    rules: Vec<Box<dyn InferenceRule>>,
    max_iterations: usize,
}

impl RuleEngine {
    /// Create an engine with the default iteration budget
    pub fn new(rules: Vec<Box<dyn InferenceRule>>) -> Self {
        Self {
            rules,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Create an engine from rule configuration
    pub fn from_specs(specs: &[RuleSpec], max_iterations: usize) -> ReasonerResult<Self> {
        let rules = specs
            .iter()
            .map(RuleSpec::build)
            .collect::<ReasonerResult<Vec<_>>>()?;
        Ok(Self::new(rules).with_max_iterations(max_iterations))
    }

    /// Create an empty engine (no rules)
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Register a new inference rule
    pub fn register_rule(&mut self, rule: Box<dyn InferenceRule>) {
        self.rules.push(rule);
    }

    /// Get the number of registered rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> &[Box<dyn InferenceRule>] {
        &self.rules
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Expand `graph` in place with the registered rules
    pub fn expand(&self, graph: &mut RelationGraph) -> ReasonerResult<ExpansionReport> {
        apply_rules_to_graph(graph, &self.rules, self.max_iterations)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::empty()
    }
}

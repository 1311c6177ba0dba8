//! Inference Rules for Relation Graph Expansion
//!
//! This module contains the generic closure rules (transitive, inverse,
//! symmetric) and two-hop composition over sets of relation types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::relation_graph::RelationGraph;
use crate::types::{Derivation, Relation, Triple};
use crate::utils::normalize_relation_type;

use super::InferenceRule;

/// Derivation from two premises, skipping reflexive or known conclusions
fn derive(
    graph: &RelationGraph,
    triple: Triple,
    rule_name: &str,
    premises: &[&Relation],
) -> Option<Derivation> {
    if triple.is_reflexive() || graph.contains_relation(&triple) {
        return None;
    }
    let premises: Vec<(Triple, u32)> = premises.iter().map(|r| (r.triple(), r.depth)).collect();
    Some(Derivation::from_premises(triple, rule_name, &premises))
}

fn relations_of_type<'a>(
    graph: &'a RelationGraph,
    relation_type: &'a str,
) -> impl Iterator<Item = &'a Relation> + 'a {
    graph
        .relations()
        .iter()
        .filter(move |r| r.relation_type == relation_type)
}

/// Transitive closure of one relation type
///
/// Example: (A, isa, B) ∧ (B, isa, C) ⇒ (A, isa, C)
pub struct TransitiveRule {
    name: String,
    relation_type: String,
}

impl TransitiveRule {
    pub fn new(relation_type: &str) -> Self {
        let relation_type = normalize_relation_type(relation_type);
        Self {
            name: format!("transitive:{}", relation_type),
            relation_type,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl InferenceRule for TransitiveRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, graph: &RelationGraph) -> Vec<Derivation> {
        let mut derived = Vec::new();
        for first in relations_of_type(graph, &self.relation_type) {
            let onward = graph.relations_from(&first.target, Some(self.relation_type.as_str()));
            for second in onward {
                let triple = Triple::new(&first.source, &self.relation_type, &second.target);
                derived.extend(derive(graph, triple, &self.name, &[first, second]));
            }
        }
        derived
    }
}

/// Inverse-relation completion for a pair of relation types
///
/// Example: (A, isa, B) ⇒ (B, inverse_isa, A), and back
pub struct InverseRule {
    name: String,
    relation_type: String,
    inverse_type: String,
}

impl InverseRule {
    pub fn new(relation_type: &str, inverse_type: &str) -> Self {
        let relation_type = normalize_relation_type(relation_type);
        let inverse_type = normalize_relation_type(inverse_type);
        Self {
            name: format!("inverse:{}/{}", relation_type, inverse_type),
            relation_type,
            inverse_type,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl InferenceRule for InverseRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, graph: &RelationGraph) -> Vec<Derivation> {
        let mut derived = Vec::new();
        let directions = [
            (&self.relation_type, &self.inverse_type),
            (&self.inverse_type, &self.relation_type),
        ];
        for (from_type, to_type) in directions {
            for relation in relations_of_type(graph, from_type) {
                let triple = Triple::new(&relation.target, to_type, &relation.source);
                derived.extend(derive(graph, triple, &self.name, &[relation]));
            }
        }
        derived
    }
}

/// Symmetric completion of one relation type
///
/// Example: (A, interacts_with, B) ⇒ (B, interacts_with, A)
pub struct SymmetricRule {
    name: String,
    relation_type: String,
}

impl SymmetricRule {
    pub fn new(relation_type: &str) -> Self {
        let relation_type = normalize_relation_type(relation_type);
        Self {
            name: format!("symmetric:{}", relation_type),
            relation_type,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl InferenceRule for SymmetricRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, graph: &RelationGraph) -> Vec<Derivation> {
        relations_of_type(graph, &self.relation_type)
            .filter_map(|relation| {
                let triple = Triple::new(&relation.target, &self.relation_type, &relation.source);
                derive(graph, triple, &self.name, &[relation])
            })
            .collect()
    }
}

/// How the two premises of a composition rule share a concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinShape {
    /// (A, r1, B) ∧ (B, r2, C) ⇒ (A, conclusion, C)
    #[default]
    Chain,
    /// (A, r1, B) ∧ (A, r2, C) ⇒ (B, conclusion, C)
    Fork,
}

/// Two-hop composition over sets of relation types
///
/// Example (chain): (Drug, treats, Disease) ∧ (Disease, isa, Class)
/// ⇒ (Drug, treats, Class)
pub struct CompositionRule {
    name: String,
    first: BTreeSet<String>,
    second: BTreeSet<String>,
    conclusion: String,
    shape: JoinShape,
}

impl CompositionRule {
    pub fn new<I, J, S, T>(name: &str, first: I, second: J, conclusion: &str, shape: JoinShape) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            name: name.to_string(),
            first: first
                .into_iter()
                .map(|t| normalize_relation_type(t.as_ref()))
                .collect(),
            second: second
                .into_iter()
                .map(|t| normalize_relation_type(t.as_ref()))
                .collect(),
            conclusion: normalize_relation_type(conclusion),
            shape,
        }
    }

    pub fn shape(&self) -> JoinShape {
        self.shape
    }
}

impl InferenceRule for CompositionRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, graph: &RelationGraph) -> Vec<Derivation> {
        let mut derived = Vec::new();
        let firsts = graph
            .relations()
            .iter()
            .filter(|r| self.first.contains(&r.relation_type));

        for first in firsts {
            let (join_on, conclusion_source) = match self.shape {
                JoinShape::Chain => (&first.target, &first.source),
                JoinShape::Fork => (&first.source, &first.target),
            };
            for second in graph.relations_from(join_on, None) {
                if !self.second.contains(&second.relation_type) || second == first {
                    continue;
                }
                let triple = Triple::new(conclusion_source, &self.conclusion, &second.target);
                derived.extend(derive(graph, triple, &self.name, &[first, second]));
            }
        }
        derived
    }
}

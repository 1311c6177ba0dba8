//! Write operations for the relation graph

use std::collections::btree_map::Entry;

use tracing::trace;

use crate::error::{ReasonerError, ReasonerResult};
use crate::types::{Concept, Provenance, Relation, RelationChange};
use crate::utils::normalize_relation_type;
use crate::validation::validate_identifier;

use super::RelationGraph;

/// Register a concept, or return the existing one with the same id.
///
/// A placeholder created by `add_relation` is completed by the first full
/// registration; any other existing concept is returned unchanged.
pub fn add_concept<'g>(
    graph: &'g mut RelationGraph,
    id: &str,
    name: &str,
    synonyms: Vec<String>,
    semantic_type: Option<String>,
) -> ReasonerResult<&'g Concept> {
    let id = validate_identifier("concept id", id)?;

    match graph.concepts.entry(id.to_string()) {
        Entry::Occupied(entry) => {
            let concept = entry.into_mut();
            if concept.placeholder {
                trace!(concept = id, "completing placeholder concept");
                *concept = Concept::with_details(
                    id.to_string(),
                    name.trim().to_string(),
                    synonyms,
                    semantic_type,
                );
            }
            Ok(concept)
        }
        Entry::Vacant(entry) => Ok(entry.insert(Concept::with_details(
            id.to_string(),
            name.trim().to_string(),
            synonyms,
            semantic_type,
        ))),
    }
}

/// Add a relation triple. Asserted relations always have depth 0;
/// inferred relations need depth >= 1.
pub fn add_relation(
    graph: &mut RelationGraph,
    source_id: &str,
    relation_type: &str,
    target_id: &str,
    provenance: Provenance,
    depth: u32,
) -> ReasonerResult<RelationChange> {
    let source = validate_identifier("source concept id", source_id)?;
    let target = validate_identifier("target concept id", target_id)?;
    let relation_type = normalize_relation_type(relation_type);
    if relation_type.is_empty() {
        return Err(ReasonerError::Validation(
            "relation type must not be empty".to_string(),
        ));
    }

    let mut relation = Relation::asserted(source.to_string(), relation_type, target.to_string());
    if provenance == Provenance::Inferred {
        if depth == 0 {
            return Err(ReasonerError::Validation(format!(
                "inferred relation {} must have depth >= 1",
                relation.triple()
            )));
        }
        relation.provenance = Provenance::Inferred;
        relation.depth = depth;
    }

    Ok(insert_relation(graph, relation))
}

/// Insert an already validated relation, keeping the graph invariants:
/// one entry per triple and every endpoint registered as a concept.
pub fn insert_relation(graph: &mut RelationGraph, relation: Relation) -> RelationChange {
    let triple = relation.triple();

    if let Some(&index) = graph.triple_index.get(&triple) {
        let existing = &mut graph.relations[index];
        if existing.is_inferred() && relation.is_asserted() {
            existing.provenance = Provenance::Asserted;
            existing.depth = 0;
            existing.rule = None;
            existing.premises.clear();
            return RelationChange::Upgraded;
        }
        return RelationChange::Unchanged;
    }

    for endpoint in [&relation.source, &relation.target] {
        graph
            .concepts
            .entry(endpoint.clone())
            .or_insert_with(|| Concept::placeholder(endpoint.clone()));
    }

    let index = graph.relations.len();
    graph
        .outgoing
        .entry(relation.source.clone())
        .or_default()
        .push(index);
    graph
        .incoming
        .entry(relation.target.clone())
        .or_default()
        .push(index);
    graph.triple_index.insert(triple, index);
    graph.relations.push(relation);

    RelationChange::Added
}

/// Check the structural invariants. A failure means the graph is corrupt.
pub fn verify_integrity(graph: &RelationGraph) -> ReasonerResult<()> {
    if graph.triple_index.len() != graph.relations.len() {
        return Err(ReasonerError::Integrity(format!(
            "{} relations but {} indexed triples",
            graph.relations.len(),
            graph.triple_index.len()
        )));
    }

    for (index, relation) in graph.relations.iter().enumerate() {
        let triple = relation.triple();
        if graph.triple_index.get(&triple) != Some(&index) {
            return Err(ReasonerError::Integrity(format!(
                "duplicate or unindexed triple {}",
                triple
            )));
        }
        for endpoint in [&relation.source, &relation.target] {
            if !graph.concepts.contains_key(endpoint) {
                return Err(ReasonerError::Integrity(format!(
                    "dangling endpoint '{}' in {}",
                    endpoint, triple
                )));
            }
        }
        let depth_ok = match relation.provenance {
            Provenance::Asserted => relation.depth == 0,
            Provenance::Inferred => relation.depth >= 1,
        };
        if !depth_ok {
            return Err(ReasonerError::Integrity(format!(
                "{} relation {} has depth {}",
                relation.provenance, triple, relation.depth
            )));
        }
    }

    Ok(())
}

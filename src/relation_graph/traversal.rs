//! Read operations: adjacency iteration, structural depth, explanations

use crate::types::{Relation, Triple};
use crate::utils::{humanize_relation_type, normalize_relation_type};

use super::RelationGraph;

/// Lazy iterator over the relations adjacent to one concept.
///
/// Clone it to replay the remaining items; call `relations_from` again for a
/// fresh pass.
#[derive(Debug, Clone)]
pub struct RelationIter<'a> {
    relations: &'a [Relation],
    indices: std::slice::Iter<'a, usize>,
    relation_type: Option<String>,
}

impl<'a> Iterator for RelationIter<'a> {
    type Item = &'a Relation;

    fn next(&mut self) -> Option<&'a Relation> {
        for &index in self.indices.by_ref() {
            let relation = &self.relations[index];
            match &self.relation_type {
                Some(wanted) if relation.relation_type != *wanted => continue,
                _ => return Some(relation),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.indices.len()))
    }
}

fn iter_indices<'a>(
    graph: &'a RelationGraph,
    indices: Option<&'a Vec<usize>>,
    relation_type: Option<&str>,
) -> RelationIter<'a> {
    RelationIter {
        relations: &graph.relations,
        indices: indices.map(|v| v.as_slice()).unwrap_or(&[]).iter(),
        relation_type: relation_type.map(normalize_relation_type),
    }
}

/// Outgoing relations of a concept, optionally filtered by type
pub fn relations_from<'a>(
    graph: &'a RelationGraph,
    concept_id: &str,
    relation_type: Option<&str>,
) -> RelationIter<'a> {
    iter_indices(graph, graph.outgoing.get(concept_id), relation_type)
}

/// Incoming relations of a concept, optionally filtered by type
pub fn relations_to<'a>(
    graph: &'a RelationGraph,
    concept_id: &str,
    relation_type: Option<&str>,
) -> RelationIter<'a> {
    iter_indices(graph, graph.incoming.get(concept_id), relation_type)
}

/// Inference depth at which a concept is known, with the rule that reached it.
///
/// Any asserted relation touching the concept (or no relation at all) means
/// depth 0. Otherwise the shallowest inferred relation decides; equal depths
/// are broken by rule name. `None` if the concept is not in the graph.
pub fn structural_depth<'a>(
    graph: &'a RelationGraph,
    concept_id: &str,
) -> Option<(u32, Option<&'a str>)> {
    if !graph.contains_concept(concept_id) {
        return None;
    }

    let mut best: Option<(u32, Option<&'a str>)> = None;
    let incident =
        relations_from(graph, concept_id, None).chain(relations_to(graph, concept_id, None));

    for relation in incident {
        if relation.is_asserted() {
            return Some((0, None));
        }
        let candidate = (relation.depth, relation.rule.as_deref());
        best = match best {
            Some(current) if current <= candidate => Some(current),
            _ => Some(candidate),
        };
    }

    Some(best.unwrap_or((0, None)))
}

/// Sentence form of a relation, as sent to a relevance oracle
pub fn describe(graph: &RelationGraph, relation: &Relation) -> String {
    let name = |id: &str| {
        graph
            .concept(id)
            .map(|c| c.display_name().to_string())
            .unwrap_or_else(|| id.to_string())
    };
    format!(
        "{} {} {}",
        name(&relation.source),
        humanize_relation_type(&relation.relation_type),
        name(&relation.target)
    )
}

/// Human-readable derivation of a relation
pub fn explain(graph: &RelationGraph, triple: &Triple) -> Option<String> {
    let relation = graph.relation(triple)?;

    if relation.is_asserted() {
        return Some(format!("Asserted: {}", triple));
    }

    let rule = relation.rule.as_deref().unwrap_or("external");
    let mut explanation = format!("Inferred {} via {} at depth {}", triple, rule, relation.depth);
    if !relation.premises.is_empty() {
        let premises: Vec<String> = relation
            .premises
            .iter()
            .map(|p| format!("{} -[{}]-> {}", p.source, p.relation_type, p.target))
            .collect();
        explanation.push_str(&format!(" from {}", premises.join(" and ")));
    }
    Some(explanation)
}

//! Relation Graph - per-query concept and relation store
//!
//! The graph owns the concepts and relations of one reasoning session and
//! indexes relations by source and target concept for the rule engine.
//! Writes take `&mut self`; callers sharing a graph serialize access.

mod crud;
mod traversal;

use std::collections::{BTreeMap, HashMap};

use crate::error::ReasonerResult;
use crate::types::{Concept, Provenance, Relation, RelationChange, Triple};

pub use traversal::RelationIter;

/// In-memory concept graph for one reasoning session
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    pub(crate) concepts: BTreeMap<String, Concept>,
    pub(crate) relations: Vec<Relation>,
    pub(crate) triple_index: HashMap<Triple, usize>,
    pub(crate) outgoing: HashMap<String, Vec<usize>>,
    pub(crate) incoming: HashMap<String, Vec<usize>>,
}

impl RelationGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered concepts (placeholders included)
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// Number of distinct relation triples
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty() && self.relations.is_empty()
    }

    pub fn concept(&self, id: &str) -> Option<&Concept> {
        self.concepts.get(id)
    }

    pub fn contains_concept(&self, id: &str) -> bool {
        self.concepts.contains_key(id)
    }

    /// Concepts ordered by id
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> + Clone + '_ {
        self.concepts.values()
    }

    /// Relations in insertion order
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn relation(&self, triple: &Triple) -> Option<&Relation> {
        self.triple_index.get(triple).map(|&index| &self.relations[index])
    }

    pub fn contains_relation(&self, triple: &Triple) -> bool {
        self.triple_index.contains_key(triple)
    }
}

// Operations are implemented in submodules and exposed here
impl RelationGraph {
    // Write operations (from crud.rs)
    pub fn add_concept(
        &mut self,
        id: &str,
        name: &str,
        synonyms: Vec<String>,
        semantic_type: Option<String>,
    ) -> ReasonerResult<&Concept> {
        crud::add_concept(self, id, name, synonyms, semantic_type)
    }

    pub fn add_relation(
        &mut self,
        source_id: &str,
        relation_type: &str,
        target_id: &str,
        provenance: Provenance,
        depth: u32,
    ) -> ReasonerResult<RelationChange> {
        crud::add_relation(self, source_id, relation_type, target_id, provenance, depth)
    }

    pub(crate) fn insert_relation(&mut self, relation: Relation) -> RelationChange {
        crud::insert_relation(self, relation)
    }

    // Read operations (from traversal.rs)
    pub fn relations_from(&self, concept_id: &str, relation_type: Option<&str>) -> RelationIter<'_> {
        traversal::relations_from(self, concept_id, relation_type)
    }

    pub fn relations_to(&self, concept_id: &str, relation_type: Option<&str>) -> RelationIter<'_> {
        traversal::relations_to(self, concept_id, relation_type)
    }

    pub fn structural_depth(&self, concept_id: &str) -> Option<(u32, Option<&str>)> {
        traversal::structural_depth(self, concept_id)
    }

    pub fn describe(&self, relation: &Relation) -> String {
        traversal::describe(self, relation)
    }

    pub fn explain(&self, triple: &Triple) -> Option<String> {
        traversal::explain(self, triple)
    }

    pub fn verify_integrity(&self) -> ReasonerResult<()> {
        crud::verify_integrity(self)
    }
}

//! Seams to external collaborators
//!
//! The terminology service and the relevance model live outside this crate.
//! Their network handling, retries and rate limits stay behind these traits;
//! the reasoning core only sees the data they return.

mod cache;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReasonerResult;
use crate::types::{ConceptRecord, TripleRecord};

pub use cache::{CacheStats, CachedTerminology, ConceptCache};

/// Supplies concepts and asserted relation triples (e.g. a UMLS client)
pub trait TerminologySource {
    /// Concept details for an id, if the source knows it
    fn concept(&self, id: &str) -> Option<ConceptRecord>;

    /// Relations whose source or target is `id`
    fn relations(&self, id: &str) -> Vec<TripleRecord>;
}

/// Scores how relevant a passage is to a query (e.g. a cross-encoder).
/// Higher is more relevant; the scale only needs to be consistent.
pub trait RelevanceOracle {
    fn score(&self, query: &str, passage: &str) -> f64;
}

/// Similarity between two texts, e.g. cosine over sentence embeddings.
/// Used to trade query relevance against redundancy among passages.
pub trait SimilarityOracle {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

impl<T: TerminologySource + ?Sized> TerminologySource for &T {
    fn concept(&self, id: &str) -> Option<ConceptRecord> {
        (**self).concept(id)
    }

    fn relations(&self, id: &str) -> Vec<TripleRecord> {
        (**self).relations(id)
    }
}

impl<F> RelevanceOracle for F
where
    F: Fn(&str, &str) -> f64,
{
    fn score(&self, query: &str, passage: &str) -> f64 {
        self(query, passage)
    }
}

impl<F> SimilarityOracle for F
where
    F: Fn(&str, &str) -> f64,
{
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// Terminology snapshot held in memory, e.g. a recorded fixture
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticTerminology {
    #[serde(default)]
    pub concepts: Vec<ConceptRecord>,
    #[serde(default)]
    pub relations: Vec<TripleRecord>,
    #[serde(skip)]
    by_id: HashMap<String, usize>,
}

impl StaticTerminology {
    pub fn new(concepts: Vec<ConceptRecord>, relations: Vec<TripleRecord>) -> Self {
        let mut source = Self {
            concepts,
            relations,
            by_id: HashMap::new(),
        };
        source.reindex();
        source
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ReasonerResult<Self> {
        let content = fs::read_to_string(path)?;
        let source: Self = serde_json::from_str(&content)?;
        Ok(Self::new(source.concepts, source.relations))
    }

    fn reindex(&mut self) {
        self.by_id = self
            .concepts
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
    }
}

impl TerminologySource for StaticTerminology {
    fn concept(&self, id: &str) -> Option<ConceptRecord> {
        self.by_id.get(id).map(|&i| self.concepts[i].clone())
    }

    fn relations(&self, id: &str) -> Vec<TripleRecord> {
        self.relations
            .iter()
            .filter(|r| r.source_id == id || r.target_id == id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> StaticTerminology {
        StaticTerminology::new(
            vec![ConceptRecord::new("C1", "Aspirin"), ConceptRecord::new("C2", "Headache")],
            vec![
                TripleRecord::new("C1", "may_treat", "C2"),
                TripleRecord::new("C3", "isa", "C4"),
            ],
        )
    }

    #[test]
    fn test_static_terminology_lookup() {
        let source = fixture();
        assert_eq!(source.concept("C1").unwrap().name, "Aspirin");
        assert!(source.concept("C9").is_none());
        assert_eq!(source.relations("C2").len(), 1);
        assert!(source.relations("C9").is_empty());
    }

    #[test]
    fn test_static_terminology_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("umls.json");
        fs::write(
            &path,
            r#"{"concepts": [{"id": "C1", "name": "Aspirin"}],
                "relations": [{"sourceId": "C1", "relationType": "isa", "targetId": "C2"}]}"#,
        )
        .unwrap();

        let source = StaticTerminology::from_json_file(&path).unwrap();
        assert_eq!(source.concept("C1").unwrap().name, "Aspirin");
        assert_eq!(source.relations("C1").len(), 1);
    }

    #[test]
    fn test_closure_oracle() {
        let oracle = |_query: &str, passage: &str| passage.len() as f64;
        assert_eq!(oracle.score("q", "abc"), 3.0);
    }
}

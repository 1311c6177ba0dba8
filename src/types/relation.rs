//! Relation types for the relation graph

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a relation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Returned directly by the terminology source
    Asserted,
    /// Produced by an inference rule
    Inferred,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Asserted => write!(f, "asserted"),
            Provenance::Inferred => write!(f, "inferred"),
        }
    }
}

/// The identity of a relation: (source, relation type, target)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub source: String,
    #[serde(rename = "relationType")]
    pub relation_type: String,
    pub target: String,
}

impl Triple {
    pub fn new(source: &str, relation_type: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            relation_type: relation_type.to_string(),
            target: target.to_string(),
        }
    }

    /// A triple whose source and target are the same concept
    pub fn is_reflexive(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.source, self.relation_type, self.target)
    }
}

/// Directed typed relation between two concepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub source: String,
    #[serde(rename = "relationType")]
    pub relation_type: String,
    pub target: String,
    pub provenance: Provenance,
    /// 0 for asserted relations, 1 + max(premise depth) for inferred ones
    #[serde(default)]
    pub depth: u32,
    #[serde(rename = "ruleName", default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub premises: Vec<Triple>,
}

impl Relation {
    /// Create an asserted relation
    pub fn asserted(source: String, relation_type: String, target: String) -> Self {
        Self {
            source,
            relation_type,
            target,
            provenance: Provenance::Asserted,
            depth: 0,
            rule: None,
            premises: Vec::new(),
        }
    }

    /// Create an inferred relation produced by `rule` from `premises`
    pub fn inferred(triple: Triple, depth: u32, rule: String, premises: Vec<Triple>) -> Self {
        Self {
            source: triple.source,
            relation_type: triple.relation_type,
            target: triple.target,
            provenance: Provenance::Inferred,
            depth,
            rule: Some(rule),
            premises,
        }
    }

    pub fn triple(&self) -> Triple {
        Triple::new(&self.source, &self.relation_type, &self.target)
    }

    pub fn is_asserted(&self) -> bool {
        self.provenance == Provenance::Asserted
    }

    pub fn is_inferred(&self) -> bool {
        self.provenance == Provenance::Inferred
    }
}

/// Relation triple supplied by a terminology source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripleRecord {
    #[serde(rename = "sourceId")]
    pub source_id: String,
    #[serde(rename = "relationType")]
    pub relation_type: String,
    #[serde(rename = "targetId")]
    pub target_id: String,
}

impl TripleRecord {
    pub fn new(source_id: &str, relation_type: &str, target_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            relation_type: relation_type.to_string(),
            target_id: target_id.to_string(),
        }
    }
}

/// Effect of an `add_relation` call on the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationChange {
    /// The triple was new
    Added,
    /// An inferred triple was re-asserted; provenance upgraded, depth reset
    Upgraded,
    /// The triple already existed with equal or stronger provenance
    Unchanged,
}

//! medgraph-reasoner
//!
//! Reasoning and ranking core for medical question answering over a
//! terminology knowledge base such as UMLS.
//!
//! # Features
//!
//! - **Rule Expansion**: Breadth-first, snapshot-based rule application to
//!   fixpoint or an iteration budget
//! - **Configurable Rules**: Transitive, inverse, symmetric and two-hop
//!   composition rules loaded from JSON
//! - **Score Fusion**: Oracle relevance × `decay ^ inference depth`
//! - **Deterministic Ranking**: Stable ordering with explicit tie-breaks
//! - **Graph Ranking**: Personalized PageRank seeded from the query entities
//! - **Diverse Passages**: Maximal marginal relevance over relation passages
//! - **Batch Sessions**: Independent queries answered in parallel
//!
//! # Modules
//!
//! - `types`: Core data structures (Concept, Relation, ScoredConcept)
//! - `relation_graph`: Per-query concept and relation store
//! - `inference`: Rule trait, built-in rules, rule catalog and engine
//! - `scoring`: Score fusion, ranking, PageRank and MMR reranking
//! - `search`: Mention-to-concept matching
//! - `collaborators`: Terminology and relevance seams, terminology cache
//! - `session`: The per-query pipeline and batch runner
//! - `config`: Reasoner configuration
//! - `validation`: Identifier checks and the relation-group vocabulary
//! - `utils`: Relation label helpers
//!
//! # Example
//!
//! ```
//! use medgraph_reasoner::{apply_rules_to_graph, InferenceRule, Provenance, RelationGraph};
//! use medgraph_reasoner::inference::TransitiveRule;
//!
//! let mut graph = RelationGraph::new();
//! graph.add_relation("A", "isa", "B", Provenance::Asserted, 0).unwrap();
//! graph.add_relation("B", "isa", "C", Provenance::Asserted, 0).unwrap();
//!
//! let rules: Vec<Box<dyn InferenceRule>> = vec![Box::new(TransitiveRule::new("isa"))];
//! let report = apply_rules_to_graph(&mut graph, &rules, 5).unwrap();
//!
//! assert_eq!(report.relations_added, 1);
//! assert!(report.reached_fixpoint());
//! ```

pub mod collaborators;
pub mod config;
pub mod error;
pub mod inference;
pub mod relation_graph;
pub mod scoring;
pub mod search;
pub mod session;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items at crate root
pub use collaborators::{ConceptCache, RelevanceOracle, SimilarityOracle, TerminologySource};
pub use config::ReasonerConfig;
pub use error::{ReasonerError, ReasonerResult};
pub use inference::{apply_rules_to_graph, InferenceRule, RuleCatalog, RuleEngine, RuleSpec};
pub use relation_graph::RelationGraph;
pub use scoring::{fuse, rank, MmrReranker, PersonalizedPageRank, Ranker, ScoreFuser};
pub use session::{run_batch, Answer, Passage, QueryInput, ReasoningSession};
pub use types::{
    Concept, ConceptRecord, Derivation, ExpansionReport, Provenance, Relation, RelationChange,
    ScoredConcept, Termination, Triple, TripleRecord,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

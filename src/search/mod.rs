//! Concept search for entity mentions
//!
//! Maps names produced by an entity recognizer to concept ids already
//! present in a relation graph.

mod concepts;

pub use concepts::{find_concepts, ConceptMatch, MatchQuality};

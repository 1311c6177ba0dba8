//! Data types for the reasoning core
//!
//! This module contains all the core data structures used throughout the crate.

mod concept;
mod inference;
mod relation;
mod scored;

pub use concept::{Concept, ConceptRecord};
pub use inference::{Derivation, ExpansionReport, Termination};
pub use relation::{Provenance, Relation, RelationChange, Triple, TripleRecord};
pub use scored::ScoredConcept;

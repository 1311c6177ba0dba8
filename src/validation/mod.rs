//! Input validation and the relation vocabulary
//!
//! This module provides identifier checks and the relation groups used by
//! configurable composition rules.

mod identifiers;
pub mod vocabulary;

pub use identifiers::{validate_identifier, validate_triple_record};
pub use vocabulary::{groups_of, relation_group, GROUP_NAMES};

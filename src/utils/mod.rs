//! Utility functions and helpers
//!
//! This module contains relation label normalization helpers.

pub mod labels;

pub use labels::{humanize_relation_type, normalize_relation_type};

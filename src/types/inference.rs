//! Inference types for the rule engine
//!
//! This module contains data structures for rule output and expansion reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Triple;

/// A relation a rule proposes to add, with the facts it was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derivation {
    pub triple: Triple,
    /// 1 + max(depth of premises)
    pub depth: u32,
    #[serde(rename = "ruleName")]
    pub rule_name: String,
    pub premises: Vec<Triple>,
}

impl Derivation {
    /// Build a derivation from premises and their depths
    pub fn from_premises(triple: Triple, rule_name: &str, premises: &[(Triple, u32)]) -> Self {
        let depth = 1 + premises.iter().map(|(_, d)| *d).max().unwrap_or(0);
        Self {
            triple,
            depth,
            rule_name: rule_name.to_string(),
            premises: premises.iter().map(|(t, _)| t.clone()).collect(),
        }
    }
}

/// Why an expansion stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// An iteration added no relation
    Fixpoint,
    /// `max_iterations` iterations ran and the last one still added relations
    IterationBudget,
}

/// Outcome of `apply_rules_to_graph`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionReport {
    #[serde(rename = "iterationsRun")]
    pub iterations_run: usize,
    #[serde(rename = "relationsAdded")]
    pub relations_added: usize,
    #[serde(rename = "terminatedBy")]
    pub terminated_by: Termination,
    /// Relations added per rule name
    #[serde(rename = "addedByRule", default)]
    pub added_by_rule: BTreeMap<String, usize>,
}

impl ExpansionReport {
    pub fn new() -> Self {
        Self {
            iterations_run: 0,
            relations_added: 0,
            terminated_by: Termination::Fixpoint,
            added_by_rule: BTreeMap::new(),
        }
    }

    pub fn reached_fixpoint(&self) -> bool {
        self.terminated_by == Termination::Fixpoint
    }
}

impl Default for ExpansionReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_depth_from_premises() {
        let derivation = Derivation::from_premises(
            Triple::new("A", "isa", "C"),
            "transitive:isa",
            &[(Triple::new("A", "isa", "B"), 1), (Triple::new("B", "isa", "C"), 0)],
        );
        assert_eq!(derivation.depth, 2);
        assert_eq!(derivation.premises.len(), 2);
    }

    #[test]
    fn test_report_serialization() {
        let report = ExpansionReport {
            iterations_run: 2,
            relations_added: 1,
            terminated_by: Termination::IterationBudget,
            added_by_rule: BTreeMap::new(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["terminatedBy"], "iteration_budget");
        assert_eq!(json["iterationsRun"], 2);
    }
}

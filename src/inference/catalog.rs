//! Rule configuration
//!
//! Rules are configuration, not a fixed built-in list. A `RuleSpec` is the
//! serialized form of one rule; a `RuleCatalog` is an ordered list of them,
//! usually loaded from JSON:
//!
//! ```json
//! {"rules": [
//!   {"kind": "transitive", "relationType": "isa"},
//!   {"kind": "inverse", "relationType": "isa", "inverseType": "inverse_isa"},
//!   {"kind": "composition", "name": "treats_class",
//!    "first": ["@treatment"], "second": ["isa"], "conclusion": "treats"}
//! ]}
//! ```
//!
//! Entries in `first`/`second` starting with `@` name a relation group from
//! [`crate::validation::vocabulary`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReasonerError, ReasonerResult};
use crate::validation::relation_group;

use super::rules::{CompositionRule, InverseRule, JoinShape, SymmetricRule, TransitiveRule};
use super::InferenceRule;

/// Serialized description of one inference rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RuleSpec {
    Transitive {
        relation_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Inverse {
        relation_type: String,
        inverse_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Symmetric {
        relation_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Composition {
        name: String,
        first: Vec<String>,
        second: Vec<String>,
        conclusion: String,
        #[serde(default)]
        shape: JoinShape,
    },
}

fn require(field: &str, value: &str) -> ReasonerResult<()> {
    if value.trim().is_empty() {
        return Err(ReasonerError::Configuration(format!(
            "rule field '{}' must not be empty",
            field
        )));
    }
    Ok(())
}

/// Expand `@group` references into relation labels
fn expand_types(field: &str, types: &[String]) -> ReasonerResult<Vec<String>> {
    let mut expanded = Vec::new();
    for entry in types {
        match entry.strip_prefix('@') {
            Some(group) => {
                let labels = relation_group(group).ok_or_else(|| {
                    ReasonerError::Configuration(format!("unknown relation group '@{}'", group))
                })?;
                expanded.extend(labels.iter().map(|label| label.to_string()));
            }
            None => {
                require(field, entry)?;
                expanded.push(entry.clone());
            }
        }
    }
    if expanded.is_empty() {
        return Err(ReasonerError::Configuration(format!(
            "rule field '{}' must list at least one relation type",
            field
        )));
    }
    Ok(expanded)
}

impl RuleSpec {
    pub fn transitive(relation_type: &str) -> Self {
        RuleSpec::Transitive {
            relation_type: relation_type.to_string(),
            name: None,
        }
    }

    pub fn inverse(relation_type: &str, inverse_type: &str) -> Self {
        RuleSpec::Inverse {
            relation_type: relation_type.to_string(),
            inverse_type: inverse_type.to_string(),
            name: None,
        }
    }

    pub fn symmetric(relation_type: &str) -> Self {
        RuleSpec::Symmetric {
            relation_type: relation_type.to_string(),
            name: None,
        }
    }

    pub fn composition(
        name: &str,
        first: &[&str],
        second: &[&str],
        conclusion: &str,
        shape: JoinShape,
    ) -> Self {
        RuleSpec::Composition {
            name: name.to_string(),
            first: first.iter().map(|s| s.to_string()).collect(),
            second: second.iter().map(|s| s.to_string()).collect(),
            conclusion: conclusion.to_string(),
            shape,
        }
    }

    /// Build the rule described by this entry
    pub fn build(&self) -> ReasonerResult<Box<dyn InferenceRule>> {
        let rule: Box<dyn InferenceRule> = match self {
            RuleSpec::Transitive {
                relation_type,
                name,
            } => {
                require("relationType", relation_type)?;
                let rule = TransitiveRule::new(relation_type);
                match name {
                    Some(name) => Box::new(rule.named(name)),
                    None => Box::new(rule),
                }
            }
            RuleSpec::Inverse {
                relation_type,
                inverse_type,
                name,
            } => {
                require("relationType", relation_type)?;
                require("inverseType", inverse_type)?;
                let rule = InverseRule::new(relation_type, inverse_type);
                match name {
                    Some(name) => Box::new(rule.named(name)),
                    None => Box::new(rule),
                }
            }
            RuleSpec::Symmetric {
                relation_type,
                name,
            } => {
                require("relationType", relation_type)?;
                let rule = SymmetricRule::new(relation_type);
                match name {
                    Some(name) => Box::new(rule.named(name)),
                    None => Box::new(rule),
                }
            }
            RuleSpec::Composition {
                name,
                first,
                second,
                conclusion,
                shape,
            } => {
                require("name", name)?;
                require("conclusion", conclusion)?;
                let first = expand_types("first", first)?;
                let second = expand_types("second", second)?;
                Box::new(CompositionRule::new(name, first, second, conclusion, *shape))
            }
        };
        Ok(rule)
    }
}

/// Ordered rule configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleCatalog {
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl RuleCatalog {
    pub fn new(rules: Vec<RuleSpec>) -> Self {
        Self { rules }
    }

    pub fn from_json_str(json: &str) -> ReasonerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ReasonerResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Build every rule, failing on the first invalid spec
    pub fn build(&self) -> ReasonerResult<Vec<Box<dyn InferenceRule>>> {
        self.rules.iter().map(RuleSpec::build).collect()
    }
}

/// The five composition rules of the UMLS question-answering reasoner,
/// expressed over relation groups. Opt-in: nothing activates them by default.
///
/// - affects: interaction then causation (chain)
/// - prevents: treatment then causation (chain)
/// - treats: treatment then hierarchy (chain)
/// - diagnoses: a concept interacting with a diagnostic source (fork)
/// - co-occurs_with: interaction and causation from one source (fork)
pub fn clinical_composition_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::composition(
            "co_occurrence",
            &["@interaction"],
            &["@causation"],
            "affects",
            JoinShape::Chain,
        ),
        RuleSpec::composition(
            "prevention",
            &["@treatment"],
            &["@causation"],
            "prevents",
            JoinShape::Chain,
        ),
        RuleSpec::composition(
            "treatment",
            &["@treatment"],
            &["@hierarchy"],
            "treats",
            JoinShape::Chain,
        ),
        RuleSpec::composition(
            "diagnosis",
            &["@interaction"],
            &["@diagnosis"],
            "diagnoses",
            JoinShape::Fork,
        ),
        RuleSpec::composition(
            "conjunction",
            &["@interaction"],
            &["@causation"],
            "co-occurs_with",
            JoinShape::Fork,
        ),
    ]
}

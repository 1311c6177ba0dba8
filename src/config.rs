//! Reasoner configuration
//!
//! Settings come from defaults, a JSON file, or `MEDGRAPH_*` environment
//! variables:
//!
//! - `MEDGRAPH_MAX_ITERATIONS`: rule engine iteration budget
//! - `MEDGRAPH_DEPTH_DECAY`: structural confidence decay in (0, 1]
//! - `MEDGRAPH_TOP_K`: answer list length (unset keeps every candidate)
//! - `MEDGRAPH_RULES_FILE`: path to a JSON rule catalog
//! - `MEDGRAPH_NORMALIZE_RELEVANCE`: map oracle logits through the logistic
//!   function before fusion (`true` by default)
//! - `MEDGRAPH_MAX_PASSAGE_CHARS`: passage length limit sent to the oracle

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReasonerError, ReasonerResult};
use crate::inference::{RuleCatalog, RuleEngine, RuleSpec, DEFAULT_MAX_ITERATIONS};
use crate::scoring::{validate_depth_decay, DEFAULT_DEPTH_DECAY};

pub const ENV_MAX_ITERATIONS: &str = "MEDGRAPH_MAX_ITERATIONS";
pub const ENV_DEPTH_DECAY: &str = "MEDGRAPH_DEPTH_DECAY";
pub const ENV_TOP_K: &str = "MEDGRAPH_TOP_K";
pub const ENV_RULES_FILE: &str = "MEDGRAPH_RULES_FILE";
pub const ENV_NORMALIZE_RELEVANCE: &str = "MEDGRAPH_NORMALIZE_RELEVANCE";
pub const ENV_MAX_PASSAGE_CHARS: &str = "MEDGRAPH_MAX_PASSAGE_CHARS";

/// Passage length limit used when none is configured
pub const DEFAULT_MAX_PASSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReasonerConfig {
    pub max_iterations: usize,
    pub depth_decay: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    /// Apply `logistic` to raw oracle scores so relevance is positive and
    /// deeper evidence always scores lower
    pub normalize_relevance: bool,
    pub max_passage_chars: usize,
    pub rules: Vec<RuleSpec>,
}

impl ReasonerConfig {
    pub fn new(rules: Vec<RuleSpec>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_depth_decay(mut self, depth_decay: f64) -> Self {
        self.depth_decay = depth_decay;
        self
    }

    pub fn with_top_k(mut self, top_k: Option<usize>) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_normalize_relevance(mut self, normalize_relevance: bool) -> Self {
        self.normalize_relevance = normalize_relevance;
        self
    }

    pub fn with_max_passage_chars(mut self, max_passage_chars: usize) -> Self {
        self.max_passage_chars = max_passage_chars;
        self
    }

    /// Load from the process environment
    pub fn from_env() -> ReasonerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> ReasonerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_MAX_ITERATIONS) {
            config.max_iterations = parse_var(ENV_MAX_ITERATIONS, &value)?;
        }
        if let Some(value) = lookup(ENV_DEPTH_DECAY) {
            config.depth_decay = parse_var(ENV_DEPTH_DECAY, &value)?;
        }
        if let Some(value) = lookup(ENV_TOP_K) {
            config.top_k = Some(parse_var(ENV_TOP_K, &value)?);
        }
        if let Some(value) = lookup(ENV_NORMALIZE_RELEVANCE) {
            config.normalize_relevance = parse_var(ENV_NORMALIZE_RELEVANCE, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_PASSAGE_CHARS) {
            config.max_passage_chars = parse_var(ENV_MAX_PASSAGE_CHARS, &value)?;
        }
        if let Some(path) = lookup(ENV_RULES_FILE) {
            debug!(path = %path, "loading rule catalog");
            config.rules = RuleCatalog::from_json_file(path.trim())?.rules;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a full configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ReasonerResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ReasonerResult<()> {
        if self.max_iterations == 0 {
            return Err(ReasonerError::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        validate_depth_decay(self.depth_decay)?;
        if self.top_k == Some(0) {
            return Err(ReasonerError::Configuration(
                "top_k must be positive when set".to_string(),
            ));
        }
        if self.max_passage_chars == 0 {
            return Err(ReasonerError::Configuration(
                "max_passage_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the rule engine described by this configuration
    pub fn rule_engine(&self) -> ReasonerResult<RuleEngine> {
        RuleEngine::from_specs(&self.rules, self.max_iterations)
    }
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            depth_decay: DEFAULT_DEPTH_DECAY,
            top_k: None,
            normalize_relevance: true,
            max_passage_chars: DEFAULT_MAX_PASSAGE_CHARS,
            rules: Vec::new(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> ReasonerResult<T> {
    value.trim().parse().map_err(|_| {
        ReasonerError::Configuration(format!("invalid value for {}: '{}'", key, value))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ReasonerConfig::default();
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.depth_decay, 0.8);
        assert_eq!(config.top_k, None);
        assert!(config.normalize_relevance);
        assert_eq!(config.max_passage_chars, 500);
        assert!(config.rules.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ReasonerConfig::from_lookup(lookup(&[
            (ENV_MAX_ITERATIONS, "3"),
            (ENV_DEPTH_DECAY, " 0.5 "),
            (ENV_TOP_K, "5"),
        ]))
        .unwrap();

        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.depth_decay, 0.5);
        assert_eq!(config.top_k, Some(5));
    }

    #[test]
    fn test_relevance_settings_from_lookup() {
        let config = ReasonerConfig::from_lookup(lookup(&[
            (ENV_NORMALIZE_RELEVANCE, "false"),
            (ENV_MAX_PASSAGE_CHARS, "120"),
        ]))
        .unwrap();
        assert!(!config.normalize_relevance);
        assert_eq!(config.max_passage_chars, 120);

        let err = ReasonerConfig::from_lookup(lookup(&[(ENV_NORMALIZE_RELEVANCE, "sometimes")]));
        assert!(matches!(err, Err(ReasonerError::Configuration(_))));

        let err = ReasonerConfig::from_lookup(lookup(&[(ENV_MAX_PASSAGE_CHARS, "0")]));
        assert!(matches!(err, Err(ReasonerError::Configuration(_))));
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = ReasonerConfig::from_lookup(lookup(&[(ENV_MAX_ITERATIONS, "many")]));
        assert!(matches!(err, Err(ReasonerError::Configuration(_))));

        let err = ReasonerConfig::from_lookup(lookup(&[(ENV_DEPTH_DECAY, "1.5")]));
        assert!(matches!(err, Err(ReasonerError::Configuration(_))));

        let err = ReasonerConfig::from_lookup(lookup(&[(ENV_TOP_K, "0")]));
        assert!(matches!(err, Err(ReasonerError::Configuration(_))));
    }

    #[test]
    fn test_rules_file_from_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(&path, r#"{"rules": [{"kind": "transitive", "relationType": "isa"}]}"#).unwrap();

        let path = path.to_string_lossy().to_string();
        let config = ReasonerConfig::from_lookup(lookup(&[(ENV_RULES_FILE, path.as_str())])).unwrap();
        assert_eq!(config.rules, vec![RuleSpec::transitive("isa")]);
        assert_eq!(config.rule_engine().unwrap().rule_count(), 1);
    }

    #[test]
    fn test_from_json_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reasoner.json");
        fs::write(&path, r#"{"depthDecay": 0.9, "topK": 3, "normalizeRelevance": false}"#).unwrap();

        let config = ReasonerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.depth_decay, 0.9);
        assert_eq!(config.top_k, Some(3));
        assert!(!config.normalize_relevance);
        assert_eq!(config.max_passage_chars, DEFAULT_MAX_PASSAGE_CHARS);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = ReasonerConfig::from_json_file("/nonexistent/reasoner.json");
        assert!(matches!(err, Err(ReasonerError::Io(_))));
    }
}

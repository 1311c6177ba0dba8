//! Mention-to-concept matching over a relation graph

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::relation_graph::RelationGraph;
use crate::types::Concept;

/// Threshold for using parallel search (concept count)
const PARALLEL_SEARCH_THRESHOLD: usize = 1000;

/// How a mention matched a concept, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchQuality {
    /// The mention is the concept id
    ExactId,
    /// The mention equals the canonical name (case-insensitive)
    ExactName,
    /// The mention equals one of the synonyms (case-insensitive)
    ExactSynonym,
    /// Every token of the mention appears in the name or a synonym
    Tokens,
}

/// A concept found for a mention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptMatch {
    #[serde(rename = "conceptId")]
    pub concept_id: String,
    pub quality: MatchQuality,
}

/// Lowercased tokens, split on whitespace and punctuation
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn match_concept(
    concept: &Concept,
    mention: &str,
    mention_tokens: &[String],
) -> Option<MatchQuality> {
    if concept.id == mention {
        return Some(MatchQuality::ExactId);
    }
    let lowered = mention.to_lowercase();
    if !concept.name.is_empty() && concept.name.to_lowercase() == lowered {
        return Some(MatchQuality::ExactName);
    }
    if concept.synonyms.iter().any(|s| s.to_lowercase() == lowered) {
        return Some(MatchQuality::ExactSynonym);
    }
    if mention_tokens.is_empty() {
        return None;
    }
    let covered = std::iter::once(&concept.name)
        .chain(concept.synonyms.iter())
        .any(|label| {
            let tokens: HashSet<String> = tokenize(label).into_iter().collect();
            mention_tokens.iter().all(|t| tokens.contains(t))
        });
    covered.then_some(MatchQuality::Tokens)
}

/// Find concepts in `graph` matching a recognized entity mention.
///
/// Results are ordered by match quality, then concept id.
pub fn find_concepts(
    graph: &RelationGraph,
    mention: &str,
    limit: Option<usize>,
) -> Vec<ConceptMatch> {
    let mention = mention.trim();
    if mention.is_empty() {
        return Vec::new();
    }
    let mention_tokens = tokenize(mention);

    let mut matches: Vec<ConceptMatch> = if graph.concept_count() > PARALLEL_SEARCH_THRESHOLD {
        graph
            .concepts
            .par_iter()
            .filter_map(|(id, concept)| {
                match_concept(concept, mention, &mention_tokens).map(|quality| ConceptMatch {
                    concept_id: id.clone(),
                    quality,
                })
            })
            .collect()
    } else {
        graph
            .concepts()
            .filter_map(|concept| {
                match_concept(concept, mention, &mention_tokens).map(|quality| ConceptMatch {
                    concept_id: concept.id.clone(),
                    quality,
                })
            })
            .collect()
    };

    matches.sort_by(|a, b| {
        a.quality
            .cmp(&b.quality)
            .then_with(|| a.concept_id.cmp(&b.concept_id))
    });
    if let Some(lim) = limit {
        matches.truncate(lim);
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_graph() -> RelationGraph {
        let mut graph = RelationGraph::new();
        graph
            .add_concept(
                "C0020538",
                "Hypertensive disease",
                vec!["High blood pressure".to_string(), "HTN".to_string()],
                Some("Disease or Syndrome".to_string()),
            )
            .unwrap();
        graph
            .add_concept("C0005823", "Blood Pressure", vec![], None)
            .unwrap();
        graph
            .add_concept("C0004057", "Aspirin", vec!["ASA".to_string()], None)
            .unwrap();
        graph
    }

    #[test]
    fn test_exact_matches() {
        let graph = create_test_graph();
        assert_eq!(
            find_concepts(&graph, "C0004057", None)[0].quality,
            MatchQuality::ExactId
        );
        assert_eq!(
            find_concepts(&graph, "aspirin", None),
            vec![ConceptMatch {
                concept_id: "C0004057".to_string(),
                quality: MatchQuality::ExactName,
            }]
        );
        assert_eq!(
            find_concepts(&graph, "htn", None)[0].quality,
            MatchQuality::ExactSynonym
        );
    }

    #[test]
    fn test_token_matches_ordered_by_quality() {
        let graph = create_test_graph();
        let matches = find_concepts(&graph, "blood pressure", None);

        let ids: Vec<&str> = matches.iter().map(|m| m.concept_id.as_str()).collect();
        assert_eq!(ids, vec!["C0005823", "C0020538"]);
        assert_eq!(matches[1].quality, MatchQuality::Tokens);
    }

    #[test]
    fn test_limit_and_blank_mention() {
        let graph = create_test_graph();
        assert_eq!(find_concepts(&graph, "blood pressure", Some(1)).len(), 1);
        assert!(find_concepts(&graph, "   ", None).is_empty());
        assert!(find_concepts(&graph, "migraine", None).is_empty());
    }
}

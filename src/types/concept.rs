//! Concept types for the relation graph

use serde::{Deserialize, Serialize};

/// A terminology concept (e.g. a UMLS CUI with its preferred name)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(
        rename = "semanticType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub semantic_type: Option<String>,
    /// Registered implicitly as a relation endpoint; only the id is known
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
}

impl Concept {
    /// Create a new concept with a name and no synonyms
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            synonyms: Vec::new(),
            semantic_type: None,
            placeholder: false,
        }
    }

    /// Create a fully described concept
    pub fn with_details(
        id: String,
        name: String,
        synonyms: Vec<String>,
        semantic_type: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            synonyms,
            semantic_type,
            placeholder: false,
        }
    }

    /// Create a placeholder concept that only knows its id
    pub fn placeholder(id: String) -> Self {
        Self {
            id,
            name: String::new(),
            synonyms: Vec::new(),
            semantic_type: None,
            placeholder: true,
        }
    }

    /// Name to show in answers and relation sentences (falls back to the id)
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Concept tuple supplied by a terminology source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(rename = "semanticType", default)]
    pub semantic_type: Option<String>,
}

impl ConceptRecord {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            synonyms: Vec::new(),
            semantic_type: None,
        }
    }
}

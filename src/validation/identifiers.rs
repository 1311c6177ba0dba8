//! Identifier validation

use crate::error::{ReasonerError, ReasonerResult};
use crate::types::TripleRecord;
use crate::utils::normalize_relation_type;

/// Trim an identifier and reject it if nothing is left
pub fn validate_identifier<'a>(field: &str, value: &'a str) -> ReasonerResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ReasonerError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed)
}

/// Check a terminology triple the way `add_relation` will, without
/// touching any graph
pub fn validate_triple_record(triple: &TripleRecord) -> ReasonerResult<()> {
    validate_identifier("source concept id", &triple.source_id)?;
    validate_identifier("target concept id", &triple.target_id)?;
    if normalize_relation_type(&triple.relation_type).is_empty() {
        return Err(ReasonerError::Validation(format!(
            "relation type of ({}, {}) must not be empty",
            triple.source_id, triple.target_id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier_trims() {
        assert_eq!(validate_identifier("concept id", " C0018681 ").unwrap(), "C0018681");
    }

    #[test]
    fn test_validate_identifier_rejects_blank() {
        let err = validate_identifier("concept id", " \t").unwrap_err();
        assert!(err.to_string().contains("concept id must not be empty"));
    }

    #[test]
    fn test_validate_triple_record() {
        assert!(validate_triple_record(&TripleRecord::new("C1", "Is A", "C2")).is_ok());
        for bad in [
            TripleRecord::new(" ", "isa", "C2"),
            TripleRecord::new("C1", "isa", ""),
            TripleRecord::new("C1", "  ", "C2"),
        ] {
            assert!(matches!(validate_triple_record(&bad), Err(ReasonerError::Validation(_))));
        }
    }
}

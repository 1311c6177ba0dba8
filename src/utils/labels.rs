//! Relation label helpers

/// Canonical form of a relation type: trimmed, lowercased, inner whitespace
/// collapsed to `_`. Hyphens are kept (`co-occurs_with`).
pub fn normalize_relation_type(label: &str) -> String {
    label
        .split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Readable form of a relation type (`may_be_treated_by` → `may be treated by`)
pub fn humanize_relation_type(label: &str) -> String {
    label.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_relation_type() {
        assert_eq!(normalize_relation_type("  ISA "), "isa");
        assert_eq!(normalize_relation_type("may be  treated by"), "may_be_treated_by");
        assert_eq!(normalize_relation_type("Co-occurs_With"), "co-occurs_with");
        assert_eq!(normalize_relation_type("   "), "");
    }

    #[test]
    fn test_humanize_relation_type() {
        assert_eq!(humanize_relation_type("may_be_treated_by"), "may be treated by");
        assert_eq!(humanize_relation_type("isa"), "isa");
    }
}

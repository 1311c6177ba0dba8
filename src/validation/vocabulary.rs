//! Relation groups of the UMLS relation vocabulary
//!
//! Groups let composition rules match a family of relation labels at once.
//! Rule configuration refers to a group as `@name` (e.g. `@treatment`).

/// Taxonomic and part-whole relations
pub const HIERARCHY: &[&str] = &[
    "isa",
    "inverse_isa",
    "part_of",
    "has_part",
    "classified_as",
    "classifies",
    "constitutional_part_of",
    "conceptual_part_of",
    "regional_part_of",
    "has_regional_part",
    "system_of",
    "has_system",
    "supersystem_of",
    "has_supersystem",
    "entire_anatomy_structure_of",
    "has_entire_anatomy_structure",
    "anatomic_structure_is_physical_part_of",
    "has_physical_part_of_anatomic_structure",
    "develops_from",
    "develops_into",
    "matures_from",
    "matures_into",
    "has_developmental_stage",
    "developmental_stage_of",
    "has_structural_class",
    "structural_class_of",
    "has_chemical_classification",
    "is_chemical_classification_of_gene_product",
    "has_class",
    "class_of",
    "has_subtype",
    "is_subtype_of",
    "has_parent",
    "parent_of",
    "has_member",
    "member_of",
    "pathway_has_gene_element",
];

/// Therapies, procedures and the devices and regimens they use
pub const TREATMENT: &[&str] = &[
    "treats",
    "treated_by",
    "may_be_treated_by",
    "has_therapeutic_class",
    "therapeutic_class_of",
    "regimen_has_accepted_use_for_disease",
    "disease_has_accepted_treatment_with_regimen",
    "associated_procedure_of",
    "has_associated_procedure",
    "procedure_has_target_anatomy",
    "procedure_has_completely_excised_anatomy",
    "procedure_has_partially_excised_anatomy",
    "procedure_has_excised_anatomy",
    "procedure_has_imaged_anatomy",
    "excised_anatomy_has_procedure",
    "imaged_anatomy_has_procedure",
    "has_direct_device",
    "direct_device_of",
    "has_procedure_device",
    "procedure_device_of",
    "uses_device",
    "device_used_by",
    "has_surgical_approach",
    "surgical_approach_of",
    "has_technique",
    "technique_of",
    "has_instrumentation",
    "instrumentation_of",
    "chemotherapy_regimen_has_component",
    "is_component_of_chemotherapy_regimen",
    "has_dose_form",
    "dose_form_of",
    "has_pharmaceutical_route",
    "pharmaceutical_route_of",
];

/// Causal and pathogenic relations
pub const CAUSATION: &[&str] = &[
    "causes",
    "induced_by",
    "causative_agent_of",
    "has_causative_agent",
    "due_to",
    "result_of",
    "chemical_or_drug_initiates_biological_process",
    "biological_process_has_initiator_chemical_or_drug",
    "gene_involved_in_pathogenesis_of_disease",
    "pathogenesis_of_disease_involves_gene",
    "has_pathological_process",
    "pathological_process_of",
    "has_result",
    "biological_process_has_result_biological_process",
    "biological_process_has_result_chemical_or_drug",
    "biological_process_results_from_biological_process",
    "biological_process_has_result_anatomy",
    "has_cause",
    "is_cause_of",
    "has_related_factor",
    "related_factor_of",
];

/// Findings, manifestations and morphology
pub const SYMPTOM: &[&str] = &[
    "has_symptom",
    "sign_or_symptom_of",
    "disease_has_finding",
    "has_finding",
    "manifestation_of",
    "has_manifestation",
    "has_definitional_manifestation",
    "has_associated_morphology",
    "associated_morphology_of",
    "has_direct_morphology",
    "direct_morphology_of",
    "has_clinical_course",
    "clinical_course_of",
    "has_severity",
    "severity_of",
    "has_phenotype",
    "phenotype_of",
    "has_property",
    "property_of",
    "has_observed_anatomical_entity",
    "anatomical_entity_observed_in",
    "has_associated_observation",
    "associated_observation_of",
];

/// Associations and interactions between concepts
pub const INTERACTION: &[&str] = &[
    "interacts_with",
    "associated_with",
    "co-occurs_with",
    "clinically_associated_with",
    "has_associated_disease",
    "disease_has_associated_disease",
    "has_associated_finding",
    "associated_finding_of",
    "chemical_or_drug_affects_gene_product",
    "gene_product_affected_by_chemical_or_drug",
    "chemical_or_drug_affects_cell_type_or_tissue",
    "cell_type_or_tissue_affected_by_chemical_or_drug",
    "biological_process_involves_chemical_or_drug",
    "biological_process_involves_gene_product",
    "gene_product_is_element_in_pathway",
    "gene_is_element_in_pathway",
    "has_associated_function",
    "associated_function_of",
    "has_associated_etiologic_finding",
    "associated_etiologic_finding_of",
    "has_associated_observation",
    "associated_observation_of",
    "is_associated_anatomic_site_of",
    "has_associated_condition",
];

/// Synonymy, mappings and lexical variants
pub const MAPPING: &[&str] = &[
    "same_as",
    "mapped_to",
    "mapped_from",
    "translation_of",
    "has_translation",
    "transliterated_form_of",
    "has_transliterated_form",
    "has_permuted_term",
    "permuted_term_of",
    "corresponds_to",
    "primary_mapped_to",
    "primary_mapped_from",
    "uniquely_mapped_to",
    "uniquely_mapped_from",
    "multiply_mapped_to",
    "multiply_mapped_from",
    "has_form",
    "form_of",
    "has_expanded_form",
    "expanded_form_of",
    "has_british_form",
    "british_form_of",
    "has_clinician_form",
    "clinician_form_of",
    "has_common_name",
    "common_name_of",
    "has_alias",
    "alias_of",
    "has_entry_term",
    "entry_term_of",
    "version_of",
    "has_version",
];

/// Diagnostic relations
pub const DIAGNOSIS: &[&str] = &["diagnoses", "diagnosed_by"];

/// Group names accepted after `@` in rule configuration
pub const GROUP_NAMES: &[&str] = &[
    "hierarchy",
    "treatment",
    "causation",
    "symptom",
    "interaction",
    "mapping",
    "diagnosis",
];

/// Look up a relation group by name (case-insensitive)
pub fn relation_group(name: &str) -> Option<&'static [&'static str]> {
    match name.to_lowercase().as_str() {
        "hierarchy" => Some(HIERARCHY),
        "treatment" => Some(TREATMENT),
        "causation" => Some(CAUSATION),
        "symptom" => Some(SYMPTOM),
        "interaction" => Some(INTERACTION),
        "mapping" => Some(MAPPING),
        "diagnosis" => Some(DIAGNOSIS),
        _ => None,
    }
}

/// Names of the groups a relation type belongs to
pub fn groups_of(relation_type: &str) -> Vec<&'static str> {
    GROUP_NAMES
        .iter()
        .copied()
        .filter(|name| relation_group(name).is_some_and(|g| g.contains(&relation_type)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_group_lookup() {
        assert!(relation_group("Treatment").unwrap().contains(&"may_be_treated_by"));
        assert!(relation_group("unknown").is_none());
    }

    #[test]
    fn test_every_group_name_resolves() {
        for name in GROUP_NAMES {
            assert!(relation_group(name).is_some(), "{} missing", name);
        }
    }

    #[test]
    fn test_groups_of_shared_label() {
        let groups = groups_of("has_associated_observation");
        assert_eq!(groups, vec!["symptom", "interaction"]);
        assert!(groups_of("not_a_label").is_empty());
    }
}

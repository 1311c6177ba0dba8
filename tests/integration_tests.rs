//! Integration tests for rule expansion, fusion and ranking

use medgraph_reasoner::inference::{
    clinical_composition_rules, InverseRule, SymmetricRule, TransitiveRule,
};
use medgraph_reasoner::{
    apply_rules_to_graph, fuse, rank, InferenceRule, Provenance, ReasonerError, RelationChange,
    RelationGraph, RuleCatalog, ScoreFuser, ScoredConcept, Termination, Triple,
};
use tracing_subscriber::EnvFilter;

/// Route engine logs to the test harness; filter with RUST_LOG
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn graph_with(edges: &[(&str, &str, &str)]) -> RelationGraph {
    let mut graph = RelationGraph::new();
    for (source, relation_type, target) in edges {
        graph
            .add_relation(source, relation_type, target, Provenance::Asserted, 0)
            .unwrap();
    }
    graph
}

fn isa_rules() -> Vec<Box<dyn InferenceRule>> {
    vec![
        Box::new(TransitiveRule::new("isa")),
        Box::new(InverseRule::new("isa", "inverse_isa")),
    ]
}

/// (triple, provenance, depth, rule) for every relation, in graph order
fn snapshot(graph: &RelationGraph) -> Vec<(String, Provenance, u32, Option<String>)> {
    graph
        .relations()
        .iter()
        .map(|r| (r.triple().to_string(), r.provenance, r.depth, r.rule.clone()))
        .collect()
}

#[test]
fn test_transitive_example() {
    init_tracing();
    let mut graph = graph_with(&[("A", "isa", "B"), ("B", "isa", "C")]);
    let rules: Vec<Box<dyn InferenceRule>> = vec![Box::new(TransitiveRule::new("isa"))];

    let report = apply_rules_to_graph(&mut graph, &rules, 5).unwrap();
    assert_eq!(report.relations_added, 1);
    assert_eq!(report.terminated_by, Termination::Fixpoint);

    let derived = graph.relation(&Triple::new("A", "isa", "C")).unwrap();
    assert_eq!(derived.provenance, Provenance::Inferred);
    assert_eq!(derived.depth, 1);

    let again = apply_rules_to_graph(&mut graph, &rules, 5).unwrap();
    assert_eq!(again.relations_added, 0);
    assert!(again.reached_fixpoint());
}

#[test]
fn test_expansion_is_idempotent() {
    let mut graph = graph_with(&[
        ("A", "isa", "B"),
        ("B", "isa", "C"),
        ("C", "isa", "D"),
        ("X", "interacts_with", "A"),
    ]);
    let mut rules = isa_rules();
    rules.push(Box::new(SymmetricRule::new("interacts_with")));

    apply_rules_to_graph(&mut graph, &rules, 10).unwrap();
    let expanded = snapshot(&graph);

    let report = apply_rules_to_graph(&mut graph, &rules, 10).unwrap();
    assert_eq!(report.relations_added, 0);
    assert_eq!(report.iterations_run, 1);
    assert_eq!(snapshot(&graph), expanded);
}

#[test]
fn test_expansion_is_monotonic() {
    let mut graph = graph_with(&[("A", "isa", "B"), ("B", "isa", "C"), ("C", "isa", "A")]);
    let before = snapshot(&graph);

    apply_rules_to_graph(&mut graph, &isa_rules(), 10).unwrap();

    let after = snapshot(&graph);
    for relation in &before {
        assert!(after.contains(relation), "lost {:?}", relation);
    }
    assert!(after.len() > before.len());
    // the cycle never concludes (X, isa, X)
    assert!(graph.relations().iter().all(|r| r.source != r.target));
}

#[test]
fn test_expansion_ignores_rule_order() {
    let edges = [
        ("A", "isa", "B"),
        ("B", "isa", "C"),
        ("C", "isa", "D"),
        ("D", "inverse_isa", "E"),
    ];

    let mut forward = graph_with(&edges);
    apply_rules_to_graph(&mut forward, &isa_rules(), 10).unwrap();

    let mut reversed_rules = isa_rules();
    reversed_rules.reverse();
    let mut backward = graph_with(&edges);
    apply_rules_to_graph(&mut backward, &reversed_rules, 10).unwrap();

    assert_eq!(snapshot(&forward), snapshot(&backward));
}

#[test]
fn test_inferred_depth_is_one_more_than_deepest_premise() {
    let mut graph = graph_with(&[
        ("A", "isa", "B"),
        ("B", "isa", "C"),
        ("C", "isa", "D"),
        ("D", "isa", "E"),
    ]);
    apply_rules_to_graph(&mut graph, &isa_rules(), 10).unwrap();

    for relation in graph.relations().iter().filter(|r| r.is_inferred()) {
        let deepest = relation
            .premises
            .iter()
            .map(|p| graph.relation(p).expect("premise present").depth)
            .max()
            .unwrap();
        assert_eq!(relation.depth, deepest + 1, "{}", relation.triple());
    }
    // A reaches E in two rounds: (A,C),(B,D),(C,E) then (A,E) from depth-1 premises
    assert_eq!(graph.relation(&Triple::new("A", "isa", "E")).unwrap().depth, 2);
}

#[test]
fn test_iteration_budget_is_reported() {
    init_tracing();
    let mut graph = graph_with(&[
        ("A", "isa", "B"),
        ("B", "isa", "C"),
        ("C", "isa", "D"),
        ("D", "isa", "E"),
    ]);
    let rules: Vec<Box<dyn InferenceRule>> = vec![Box::new(TransitiveRule::new("isa"))];

    let report = apply_rules_to_graph(&mut graph, &rules, 1).unwrap();
    assert_eq!(report.terminated_by, Termination::IterationBudget);
    assert_eq!(report.iterations_run, 1);
    assert_eq!(report.relations_added, 3);
}

#[test]
fn test_invalid_engine_configuration() {
    let mut graph = graph_with(&[("A", "isa", "B")]);
    assert!(matches!(
        apply_rules_to_graph(&mut graph, &[], 5),
        Err(ReasonerError::Configuration(_))
    ));
    assert!(matches!(
        apply_rules_to_graph(&mut graph, &isa_rules(), 0),
        Err(ReasonerError::Configuration(_))
    ));
}

#[test]
fn test_asserted_upgrade_after_expansion() {
    let mut graph = graph_with(&[("A", "isa", "B"), ("B", "isa", "C")]);
    let rules: Vec<Box<dyn InferenceRule>> = vec![Box::new(TransitiveRule::new("isa"))];
    apply_rules_to_graph(&mut graph, &rules, 5).unwrap();

    let change = graph
        .add_relation("A", "ISA", "C", Provenance::Asserted, 0)
        .unwrap();
    assert_eq!(change, RelationChange::Upgraded);

    let upgraded = graph.relation(&Triple::new("A", "isa", "C")).unwrap();
    assert!(upgraded.is_asserted());
    assert_eq!(upgraded.depth, 0);
    assert!(upgraded.rule.is_none());
    assert!(graph.verify_integrity().is_ok());
}

#[test]
fn test_explain_inferred_relation() {
    let mut graph = graph_with(&[("A", "isa", "B"), ("B", "isa", "C")]);
    let rules: Vec<Box<dyn InferenceRule>> = vec![Box::new(TransitiveRule::new("isa"))];
    apply_rules_to_graph(&mut graph, &rules, 5).unwrap();

    let explanation = graph.explain(&Triple::new("A", "isa", "C")).unwrap();
    assert!(explanation.contains("transitive:isa"));
    assert!(explanation.contains("A -[isa]-> B"));
    assert!(explanation.contains("B -[isa]-> C"));
    assert!(graph.explain(&Triple::new("A", "isa", "Z")).is_none());
}

#[test]
fn test_clinical_preset_from_catalog() {
    let mut graph = graph_with(&[("Metformin", "treats", "T2DM"), ("T2DM", "isa", "Diabetes")]);
    let rules = RuleCatalog::new(clinical_composition_rules()).build().unwrap();

    let report = apply_rules_to_graph(&mut graph, &rules, 10).unwrap();
    assert!(report.reached_fixpoint());

    let derived = graph
        .relation(&Triple::new("Metformin", "treats", "Diabetes"))
        .unwrap();
    assert_eq!(derived.rule.as_deref(), Some("treatment"));
    assert_eq!(report.added_by_rule.get("treatment"), Some(&1));
}

#[test]
fn test_fusion_example() {
    let mut graph = RelationGraph::new();
    graph.add_concept("X", "Example", vec![], None).unwrap();
    graph
        .add_relation("S", "affects", "X", Provenance::Inferred, 2)
        .unwrap();

    let score = fuse("X", 0.8, &graph, 0.5).unwrap();
    assert!((score - 0.2).abs() < 1e-12);
}

#[test]
fn test_fusion_penalizes_inferred_concepts() {
    let mut graph = graph_with(&[("A", "isa", "B"), ("B", "isa", "C"), ("C", "isa", "D")]);
    let rules: Vec<Box<dyn InferenceRule>> = vec![Box::new(InverseRule::new("isa", "inverse_isa"))];
    apply_rules_to_graph(&mut graph, &rules, 5).unwrap();
    graph
        .add_relation("Z", "related_to", "Q", Provenance::Inferred, 3)
        .unwrap();

    for decay in [0.3, 0.8, 0.99] {
        let fuser = ScoreFuser::new(decay).unwrap();
        for relevance in [1e-9, 0.3, 1.0, 12.5] {
            let asserted = fuser.fuse("B", relevance, &graph).unwrap();
            let inferred = fuser.fuse("Q", relevance, &graph).unwrap();
            assert!(inferred < asserted, "decay {} relevance {}", decay, relevance);
            assert_eq!(asserted, relevance);
        }
    }

    // zero relevance fuses to zero at any depth; a decay of 1 disables the penalty
    assert_eq!(ScoreFuser::default().fuse("Q", 0.0, &graph).unwrap(), 0.0);
    let flat = ScoreFuser::new(1.0).unwrap();
    assert_eq!(flat.fuse("Q", 0.4, &graph).unwrap(), flat.fuse("B", 0.4, &graph).unwrap());
}

#[test]
fn test_fusion_errors() {
    let graph = graph_with(&[("A", "isa", "B")]);
    assert!(matches!(fuse("A", f64::NAN, &graph, 0.8), Err(ReasonerError::Scoring(_))));
    assert!(matches!(fuse("A", f64::INFINITY, &graph, 0.8), Err(ReasonerError::Scoring(_))));
    assert!(matches!(fuse("missing", 0.5, &graph, 0.8), Err(ReasonerError::Scoring(_))));
    assert!(matches!(fuse("A", 0.5, &graph, 0.0), Err(ReasonerError::Configuration(_))));
    assert!(matches!(fuse("A", 0.5, &graph, 1.5), Err(ReasonerError::Configuration(_))));
    assert_eq!(fuse("A", 0.5, &graph, 1.0).unwrap(), 0.5);
}

#[test]
fn test_ranking_tie_breaks() {
    let scored = vec![
        ScoredConcept::inferred("B", 0.5, 1, "transitive:isa"),
        ScoredConcept::asserted("A", 0.5),
    ];
    let ranked = rank(scored, Some(1));
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].concept_id, "A");
}

#[test]
fn test_ranking_is_deterministic() {
    let scored = vec![
        ScoredConcept::asserted("C3", 0.1),
        ScoredConcept::inferred("C2", 0.9, 2, "inverse:isa/inverse_isa"),
        ScoredConcept::asserted("C5", 0.9),
        ScoredConcept::asserted("C1", 0.9),
        ScoredConcept::asserted("C4", -0.2),
    ];
    let mut shuffled = scored.clone();
    shuffled.rotate_left(2);

    let ids = |ranked: Vec<ScoredConcept>| -> Vec<String> {
        ranked.into_iter().map(|s| s.concept_id).collect()
    };
    let expected = vec!["C1", "C5", "C2", "C3", "C4"];
    assert_eq!(ids(rank(scored, None)), expected);
    assert_eq!(ids(rank(shuffled, Some(10))), expected);
    assert!(rank(Vec::new(), Some(3)).is_empty());
}

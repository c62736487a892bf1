//! Integration tests for the rule table.

use cypher_advisor::analyzer::rules::{evaluate, identity_rule, performance_indicators};
use cypher_advisor::analyzer::{analyze_plan_issues, Indicator, Severity};
use cypher_advisor::plan::{OperatorRecord, PlanNode};

fn issues_for(operator: &str, rows: u64, db_hits: u64) -> Vec<(Severity, String)> {
    evaluate(&OperatorRecord::new(operator, rows, db_hits, 0))
        .into_iter()
        .map(|issue| (issue.severity, issue.operator))
        .collect()
}

#[test]
fn test_always_rules() {
    for (operator, severity) in [
        ("AllNodesScan", Severity::Critical),
        ("CartesianProduct", Severity::Critical),
        ("DirectedAllRelationshipsScan", Severity::Critical),
        ("NodeByLabelScan", Severity::High),
        ("NodeIndexScan", Severity::High),
        ("Apply", Severity::Medium),
    ] {
        assert_eq!(
            issues_for(operator, 0, 0),
            vec![(severity, operator.to_string())],
            "{operator}"
        );
    }
}

#[test]
fn test_row_thresholds() {
    for (operator, bound, severity) in [
        ("Expand", 10_000, Severity::High),
        ("Filter", 10_000, Severity::Medium),
        ("Sort", 1_000, Severity::Medium),
        ("Aggregate", 10_000, Severity::Medium),
        ("Unwind", 1_000, Severity::Medium),
        ("Limit", 10_000, Severity::Medium),
        ("Skip", 1_000, Severity::Medium),
        ("NodeHashJoin", 10_000, Severity::Medium),
        ("NodeLeftHashJoin", 10_000, Severity::Medium),
    ] {
        assert!(issues_for(operator, bound, 0).is_empty(), "{operator} at bound");
        assert_eq!(
            issues_for(operator, bound + 1, 0),
            vec![(severity, operator.to_string())],
            "{operator} above bound"
        );
    }
}

#[test]
fn test_suffix_is_stripped_before_lookup() {
    let issues = evaluate(&OperatorRecord::new("AllNodesScan@neo4j", 1, 1, 2));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].operator, "AllNodesScan");
    assert_eq!(issues[0].depth, 2);
}

#[test]
fn test_unknown_operator_only_gets_db_hits_rule() {
    assert!(identity_rule("ProduceResults").is_none());
    assert!(issues_for("ProduceResults", 1_000_000, 10_000).is_empty());
    assert_eq!(
        issues_for("ProduceResults", 0, 15_000),
        vec![(Severity::High, "ProduceResults".to_string())]
    );
}

#[test]
fn test_db_hits_rule_adds_to_identity_rule() {
    let issues = evaluate(&OperatorRecord::new("AllNodesScan", 20_000, 15_000, 0));
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].severity, Severity::Critical);
    assert_eq!(issues[1].severity, Severity::High);
    assert_eq!(issues[1].issue, "High database hits (15000)");
    assert_eq!(issues[1].db_hits, Some(15_000));
}

#[test]
fn test_plan_issues_follow_preorder() {
    let plan = PlanNode::new("ProduceResults")
        .with_child(
            PlanNode::new("CartesianProduct")
                .with_child(PlanNode::new("AllNodesScan"))
                .with_child(PlanNode::new("NodeByLabelScan")),
        )
        .with_child(PlanNode::new("Sort").with_estimated_rows(5_000));

    let issues = analyze_plan_issues(&plan);
    let order: Vec<(&str, usize)> = issues
        .iter()
        .map(|issue| (issue.operator.as_str(), issue.depth))
        .collect();
    assert_eq!(
        order,
        vec![
            ("CartesianProduct", 1),
            ("AllNodesScan", 2),
            ("NodeByLabelScan", 2),
            ("Sort", 1),
        ]
    );

    assert_eq!(analyze_plan_issues(&plan), issues);
}

#[test]
fn test_indicator_thresholds_are_strict() {
    assert!(performance_indicators("Filter", 100_000, 10_000).is_empty());
    let tags = performance_indicators("Filter", 100_001, 10_001);
    assert!(tags.contains(&Indicator::HighRowCount));
    assert!(tags.contains(&Indicator::HighDbHits));
}

#[test]
fn test_indicator_name_rules() {
    assert!(performance_indicators("UndirectedAllRelationshipsScan", 0, 0).contains(&Indicator::FullScan));
    assert!(performance_indicators("CartesianProduct", 0, 0).contains(&Indicator::CartesianProduct));
    assert!(performance_indicators("NodeUniqueIndexSeek", 0, 0).contains(&Indicator::IndexUsage));
    assert!(performance_indicators("EagerAggregation", 0, 0).contains(&Indicator::EagerOperation));
}

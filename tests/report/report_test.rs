//! Integration tests for markdown reports.

use cypher_advisor::analyzer::analyze_plan;
use cypher_advisor::neo4j::QueryPlan;
use cypher_advisor::plan::PlanNode;
use cypher_advisor::report::{render_analysis, render_plan_report};

fn full_scan_plan() -> PlanNode {
    PlanNode::new("ProduceResults@neo4j")
        .with_estimated_rows(1_000)
        .with_child(
            PlanNode::new("AllNodesScan@neo4j")
                .with_estimated_rows(1_000)
                .with_db_hits(1_001),
        )
}

#[test]
fn test_analysis_sections() {
    let analysis = analyze_plan("MATCH (n) RETURN n", &full_scan_plan());
    let text = render_analysis(&analysis);

    assert!(text.starts_with("# Neo4j Query Analysis\n"));
    assert!(text.contains("- **Type**: read query\n"));
    assert!(text.contains("- **Complexity**: simple\n"));
    assert!(text.contains("- **Patterns**: node matching\n"));
    assert!(text.contains("- **Estimated Total Rows**: 2,000\n"));
    assert!(text.contains("- **Estimated DB Hits**: 1,001\n"));
    assert!(text.contains("- **[Critical] AllNodesScan** (depth 1): Full database scan"));
    assert!(text.contains("### Operator 2: AllNodesScan@neo4j\n- **Type**: AllNodesScan\n"));
    assert!(text.contains("- **Performance Indicators**: full_scan\n"));
    assert!(text.contains("## Index Recommendations\nNone\n"));
    assert!(text.contains("- **Has LIMIT**: no\n"));
    assert!(text.contains("Full database scan - will be slow on large datasets"));
}

#[test]
fn test_index_recommendations_rendered_as_cypher() {
    let analysis = analyze_plan(
        "MATCH (p:Person) WHERE p.email = $email RETURN p",
        &PlanNode::new("NodeByLabelScan"),
    );
    let text = render_analysis(&analysis);
    assert!(text.contains(
        "```cypher\nCREATE INDEX IF NOT EXISTS FOR (p:Person) ON (p.email);\n```"
    ));
}

#[test]
fn test_empty_plan_report() {
    let analysis = analyze_plan("RETURN 1", &PlanNode::default());
    let text = render_analysis(&analysis);
    assert!(text.contains("No performance issues detected"));
    assert!(text.contains("## Operator Details\nNo operators found\n"));
    assert!(text.contains("## Performance Indicators\n- none\n"));
}

#[test]
fn test_plan_report() {
    let plan = QueryPlan {
        query: "MATCH (n) RETURN n".to_string(),
        explain_plan: full_scan_plan(),
        profile_plan: None,
        execution_time_ms: None,
    };
    let analysis = analyze_plan(&plan.query, plan.best_plan());
    let text = render_plan_report(&plan, &analysis);

    assert!(text.starts_with("# Query Plan Analysis\n\n## Query\n```cypher\nMATCH (n) RETURN n\n```\n"));
    assert!(text.contains("**Execution Time**: N/A\n"));
    assert!(text.contains("\"operator\": \"AllNodesScan@neo4j\""));
    assert!(text.contains("**Total Operators**: 2\n"));
    assert!(text.contains("# Neo4j Query Analysis"));
}

//! Integration tests for plan normalization.

use cypher_advisor::plan::{normalize, normalize_object, normalize_value, PlanObject, PlanNode};
use serde_json::{json, Map, Value};

#[test]
fn test_null_and_empty_are_empty_nodes() {
    assert!(normalize(None).is_empty());
    assert!(normalize(Some(&Value::Null)).is_empty());
    assert!(normalize(Some(&json!({}))).is_empty());
    assert!(normalize(Some(&json!("not a plan"))).is_empty());
}

#[test]
fn test_hand_written_mapping() {
    let plan = json!({
        "operator": "Filter",
        "estimated_rows": 100,
        "db_hits": 7,
        "args": {"Details": "n.age > 25"},
        "children": [
            {"operator": "AllNodesScan", "estimated_rows": 1000, "identifiers": ["n"]}
        ]
    });

    let node = normalize_value(&plan);
    assert_eq!(node.operator, "Filter");
    assert_eq!(node.estimated_rows, 100);
    assert_eq!(node.db_hits, 7);
    assert_eq!(node.args.get("Details"), Some(&json!("n.age > 25")));
    assert_eq!(node.depth, 0);

    let child = &node.children[0];
    assert_eq!(child.operator, "AllNodesScan");
    assert_eq!(child.depth, 1);
    assert_eq!(child.identifiers, vec!["n".to_string()]);
}

#[test]
fn test_missing_operator_defaults_to_unknown() {
    let node = normalize_value(&json!({"estimated_rows": 3}));
    assert_eq!(node.operator, "Unknown");
    assert_eq!(node.estimated_rows, 3);
}

#[test]
fn test_http_profile_plan() {
    let plan = json!({
        "root": {
            "operatorType": "ProduceResults@neo4j",
            "dbHits": 0,
            "rows": 10,
            "EstimatedRows": 10.0,
            "identifiers": ["n"],
            "children": [{
                "operatorType": "NodeByLabelScan@neo4j",
                "dbHits": 11,
                "rows": 10,
                "EstimatedRows": 9.6,
                "Details": "n:Person",
                "identifiers": ["n"],
                "children": []
            }]
        }
    });

    let node = normalize_value(&plan);
    assert_eq!(node.operator, "ProduceResults@neo4j");
    let scan = &node.children[0];
    assert_eq!(scan.db_hits, 11);
    assert_eq!(scan.estimated_rows, 10);
    assert_eq!(scan.args.get("Details"), Some(&json!("n:Person")));
    assert!(!scan.args.contains_key("dbHits"));
}

#[test]
fn test_db_hits_key_precedence() {
    let node = normalize_value(&json!({
        "operator": "Expand",
        "db_hits": 5,
        "dbHits": 6,
        "args": {"DbHits": 7}
    }));
    assert_eq!(node.db_hits, 5);

    let node = normalize_value(&json!({"operator": "Expand", "args": {"DbHits": 7}}));
    assert_eq!(node.db_hits, 7);
}

#[test]
fn test_empty_children_are_skipped() {
    let node = normalize_value(&json!({
        "operator": "Apply",
        "children": [null, {}, {"operator": "Argument"}]
    }));
    let visited: Vec<&str> = node.iter().map(|(n, _)| n.operator.as_str()).collect();
    assert_eq!(visited, vec!["Apply", "Argument"]);
}

struct DriverPlan {
    operator_type: String,
    arguments: Map<String, Value>,
    identifiers: Vec<String>,
    children: Vec<DriverPlan>,
}

impl PlanObject for DriverPlan {
    fn operator_type(&self) -> &str {
        &self.operator_type
    }

    fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

fn driver_plan(operator: &str, rows: f64, children: Vec<DriverPlan>) -> DriverPlan {
    let mut arguments = Map::new();
    arguments.insert("EstimatedRows".to_string(), json!(rows));
    DriverPlan {
        operator_type: operator.to_string(),
        arguments,
        identifiers: vec!["n".to_string()],
        children,
    }
}

#[test]
fn test_driver_object() {
    let plan = driver_plan(
        "ProduceResults@neo4j",
        12.4,
        vec![driver_plan("AllNodesScan@neo4j", 12.4, vec![])],
    );

    let node: PlanNode = normalize_object(&plan);
    assert_eq!(node.operator, "ProduceResults@neo4j");
    assert_eq!(node.estimated_rows, 12);
    assert_eq!(node.db_hits, 0);
    assert_eq!(node.children[0].depth, 1);
    assert_eq!(node.children[0].clean_operator(), "AllNodesScan");
}

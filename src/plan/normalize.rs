//! Conversion of raw plan representations into [`PlanNode`] trees.
//!
//! Two input shapes are accepted:
//!
//! - driver-style plan objects, through the [`PlanObject`] trait
//!   (`operator_type` / `arguments` / `identifiers` / `children`), and
//! - decoded JSON mappings, either hand-written (`operator`, `args`,
//!   `estimated_rows`, `db_hits`, `children`) or as returned by the Neo4j HTTP
//!   API (`operatorType`, arguments flattened into the node, optionally wrapped
//!   in `{"root": ...}`).
//!
//! Normalization is total: missing numbers become 0, missing collections
//! become empty, and `null` or `{}` becomes an empty node.

use serde_json::{Map, Value};

use super::{PlanNode, UNKNOWN_OPERATOR};

/// Deepest plan level that is kept; subtrees below it are dropped.
pub const MAX_PLAN_DEPTH: usize = 256;

/// Keys that describe the tree itself rather than operator arguments.
const STRUCTURAL_KEYS: &[&str] = &[
    "operator",
    "operatorType",
    "identifiers",
    "children",
    "depth",
    "estimated_rows",
    "db_hits",
    "dbHits",
    "args",
    "arguments",
];

/// A plan as exposed by a database driver.
pub trait PlanObject {
    fn operator_type(&self) -> &str;

    fn arguments(&self) -> &Map<String, Value>;

    fn identifiers(&self) -> &[String];

    fn children(&self) -> &[Self]
    where
        Self: Sized;
}

/// Normalize an optional decoded plan. `None` yields an empty node.
pub fn normalize(raw: Option<&Value>) -> PlanNode {
    match raw {
        Some(value) => normalize_value(value),
        None => PlanNode::default(),
    }
}

/// Normalize a decoded JSON plan mapping.
pub fn normalize_value(value: &Value) -> PlanNode {
    from_value(unwrap_root(value), 0)
}

/// Normalize a driver plan object.
pub fn normalize_object<P: PlanObject>(plan: &P) -> PlanNode {
    from_object(plan, 0)
}

fn unwrap_root(value: &Value) -> &Value {
    match value.as_object() {
        Some(map) if !map.contains_key("operator") && !map.contains_key("operatorType") => {
            map.get("root").filter(|root| root.is_object()).unwrap_or(value)
        }
        _ => value,
    }
}

fn from_object<P: PlanObject>(plan: &P, depth: usize) -> PlanNode {
    let args = plan.arguments().clone();
    let estimated_rows = args.get("EstimatedRows").map(value_to_u64).unwrap_or(0);
    let db_hits = args.get("DbHits").map(value_to_u64).unwrap_or(0);

    let children = if exceeds_depth(depth, plan.children().len()) {
        Vec::new()
    } else {
        plan.children()
            .iter()
            .map(|child| from_object(child, depth + 1))
            .collect()
    };

    PlanNode {
        operator: plan.operator_type().to_string(),
        estimated_rows,
        db_hits,
        args,
        identifiers: plan.identifiers().to_vec(),
        depth,
        children,
    }
}

fn from_value(value: &Value, depth: usize) -> PlanNode {
    let map = match value.as_object() {
        Some(map) if !map.is_empty() => map,
        _ => {
            return PlanNode {
                depth,
                ..PlanNode::default()
            }
        }
    };

    let operator = map
        .get("operatorType")
        .or_else(|| map.get("operator"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_OPERATOR)
        .to_string();

    let args = match map.get("args").or_else(|| map.get("arguments")) {
        Some(Value::Object(args)) => args.clone(),
        // HTTP API plans flatten the arguments into the node itself.
        _ => map
            .iter()
            .filter(|(key, _)| !STRUCTURAL_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    };

    let estimated_rows = first_number(map, &args, &["estimated_rows", "EstimatedRows"]);
    let db_hits = first_number(map, &args, &["db_hits", "dbHits", "DbHits"]);

    let identifiers = map
        .get("identifiers")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let raw_children = map
        .get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let children = if exceeds_depth(depth, raw_children.len()) {
        Vec::new()
    } else {
        raw_children
            .iter()
            .map(|child| from_value(child, depth + 1))
            .collect()
    };

    PlanNode {
        operator,
        estimated_rows,
        db_hits,
        args,
        identifiers,
        depth,
        children,
    }
}

fn exceeds_depth(depth: usize, child_count: usize) -> bool {
    if child_count > 0 && depth + 1 >= MAX_PLAN_DEPTH {
        tracing::warn!(
            depth,
            dropped_children = child_count,
            "plan deeper than {} levels, truncating",
            MAX_PLAN_DEPTH
        );
        return true;
    }
    false
}

/// Look up the first present numeric key, node first, then arguments.
fn first_number(node: &Map<String, Value>, args: &Map<String, Value>, keys: &[&str]) -> u64 {
    keys.iter()
        .find_map(|key| node.get(*key))
        .or_else(|| keys.iter().find_map(|key| args.get(*key)))
        .map(value_to_u64)
        .unwrap_or(0)
}

/// Planner estimates are floats; negative or non-numeric values read as 0.
fn value_to_u64(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f.round() as u64)
            })
            .unwrap_or(0),
        _ => 0,
    }
}

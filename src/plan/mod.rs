//! Execution plan tree model.
//!
//! A [`PlanNode`] is one operator of a Cypher execution plan as reported by
//! `EXPLAIN`/`PROFILE`. Plans arrive in several shapes (driver objects, HTTP
//! JSON, hand-written fixtures); [`normalize`] turns all of them into this
//! single owned tree.
//!
//! Traversal never recurses: [`PlanNode::iter`] walks the tree pre-order with
//! an explicit stack, so pathological plan depth cannot overflow the call
//! stack during analysis.

pub mod normalize;
pub mod operators;

pub use normalize::{normalize, normalize_object, normalize_value, PlanObject, MAX_PLAN_DEPTH};
pub use operators::{clean_operator_name, is_eager_operator, is_leaf_operator, is_updating_operator};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Operator name used when a plan node does not name its operator.
pub const UNKNOWN_OPERATOR: &str = "Unknown";

/// A node in an execution plan tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanNode {
    /// Operator name, possibly carrying an `@runtime` suffix.
    pub operator: String,
    /// Planner-estimated cardinality.
    pub estimated_rows: u64,
    /// Storage engine operations (only populated by `PROFILE`).
    pub db_hits: u64,
    /// Operator-specific arguments, passed through untouched.
    pub args: Map<String, Value>,
    /// Variables bound at this node.
    pub identifiers: Vec<String>,
    /// Distance from the root (root = 0).
    pub depth: usize,
    pub children: Vec<PlanNode>,
}

impl PlanNode {
    /// Create a leaf node with the given operator name.
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            ..Self::default()
        }
    }

    pub fn with_estimated_rows(mut self, rows: u64) -> Self {
        self.estimated_rows = rows;
        self
    }

    pub fn with_db_hits(mut self, db_hits: u64) -> Self {
        self.db_hits = db_hits;
        self
    }

    pub fn with_identifiers<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifiers = identifiers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Append a child, re-deriving depths for the whole child subtree.
    pub fn with_child(mut self, mut child: PlanNode) -> Self {
        child.assign_depth(self.depth + 1);
        self.children.push(child);
        self
    }

    /// Set this node's depth and renumber every descendant accordingly.
    pub fn assign_depth(&mut self, depth: usize) {
        let mut stack = vec![(self, depth)];
        while let Some((node, depth)) = stack.pop() {
            node.depth = depth;
            for child in node.children.iter_mut() {
                stack.push((child, depth + 1));
            }
        }
    }

    /// Operator name without the runtime suffix.
    pub fn clean_operator(&self) -> &str {
        clean_operator_name(&self.operator)
    }

    /// True for the placeholder produced by normalizing `null` or `{}`.
    pub fn is_empty(&self) -> bool {
        self.operator.is_empty()
            && self.estimated_rows == 0
            && self.db_hits == 0
            && self.args.is_empty()
            && self.identifiers.is_empty()
            && self.children.is_empty()
    }

    /// Pre-order, left-to-right iterator over non-empty nodes with their
    /// traversal depth.
    pub fn iter(&self) -> PlanIter<'_> {
        PlanIter {
            stack: vec![(self, 0)],
        }
    }

    /// Number of (non-empty) nodes in the tree, the root included.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Flatten the tree into pre-order operator records.
    pub fn flatten(&self) -> Vec<OperatorRecord> {
        self.iter()
            .map(|(node, depth)| OperatorRecord {
                operator: node.operator.clone(),
                estimated_rows: node.estimated_rows,
                db_hits: node.db_hits,
                depth,
                args: node.args.clone(),
                identifiers: node.identifiers.clone(),
            })
            .collect()
    }
}

/// Stack-based pre-order traversal of a [`PlanNode`] tree.
pub struct PlanIter<'a> {
    stack: Vec<(&'a PlanNode, usize)>,
}

impl<'a> Iterator for PlanIter<'a> {
    type Item = (&'a PlanNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, depth)) = self.stack.pop() {
            if node.is_empty() {
                continue;
            }
            // Reverse so the leftmost child is popped first.
            for child in node.children.iter().rev() {
                self.stack.push((child, depth + 1));
            }
            return Some((node, depth));
        }
        None
    }
}

/// One plan operator in flat, pre-order form.
///
/// Every field is optional on input, so hand-written or partial operator
/// lists deserialize without error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorRecord {
    #[serde(default = "unknown_operator")]
    pub operator: String,
    #[serde(default)]
    pub estimated_rows: u64,
    #[serde(default)]
    pub db_hits: u64,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub args: Map<String, Value>,
    #[serde(default)]
    pub identifiers: Vec<String>,
}

fn unknown_operator() -> String {
    UNKNOWN_OPERATOR.to_string()
}

impl OperatorRecord {
    pub fn new(operator: impl Into<String>, estimated_rows: u64, db_hits: u64, depth: usize) -> Self {
        Self {
            operator: operator.into(),
            estimated_rows,
            db_hits,
            depth,
            args: Map::new(),
            identifiers: Vec::new(),
        }
    }

    pub fn clean_operator(&self) -> &str {
        clean_operator_name(&self.operator)
    }
}

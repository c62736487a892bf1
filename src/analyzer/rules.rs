//! Heuristic rule table for plan operators.
//!
//! Each operator name maps to at most one [`IdentityRule`]. When the rule's
//! trigger does not hold, nothing is reported for that operator identity; there
//! is no fall-through to other rules. The database-hits rule is evaluated
//! separately on every operator, whatever its identity.

use std::collections::BTreeSet;

use super::types::{Indicator, PerformanceIssue, Severity};
use crate::plan::OperatorRecord;

/// Operators touching more storage records than this get a High finding.
pub const HIGH_DB_HITS_THRESHOLD: u64 = 10_000;

/// Row estimates above this are tagged [`Indicator::HighRowCount`].
pub const HIGH_ROW_COUNT_THRESHOLD: u64 = 100_000;

/// When an identity rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The operator's presence alone is the problem.
    Always,
    /// Fires when the estimated row count is strictly greater than the bound.
    RowsAbove(u64),
}

impl Trigger {
    pub fn fires(&self, estimated_rows: u64) -> bool {
        match self {
            Trigger::Always => true,
            Trigger::RowsAbove(bound) => estimated_rows > *bound,
        }
    }
}

/// A finding keyed by operator identity.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityRule {
    /// Clean operator names this rule applies to.
    pub operators: &'static [&'static str],
    pub severity: Severity,
    pub trigger: Trigger,
    pub issue: &'static str,
    pub suggestion: &'static str,
    pub impact: &'static str,
}

impl IdentityRule {
    /// Evaluate against one operator. `None` when the trigger does not hold.
    pub fn evaluate(&self, record: &OperatorRecord) -> Option<PerformanceIssue> {
        if !self.trigger.fires(record.estimated_rows) {
            return None;
        }

        Some(PerformanceIssue {
            severity: self.severity,
            operator: record.clean_operator().to_string(),
            issue: self.issue.to_string(),
            suggestion: self.suggestion.to_string(),
            impact: self.impact.to_string(),
            depth: record.depth,
            estimated_rows: Some(record.estimated_rows),
            db_hits: Some(record.db_hits),
        })
    }
}

/// Identity rules, in evaluation order.
pub static IDENTITY_RULES: &[IdentityRule] = &[
    IdentityRule {
        operators: &["AllNodesScan"],
        severity: Severity::Critical,
        trigger: Trigger::Always,
        issue: "Full database scan: every node in the graph is read",
        suggestion: "Add a label to the node pattern so the planner can use a label scan or index seek",
        impact: "Cost grows with the total number of nodes in the database",
    },
    IdentityRule {
        operators: &["CartesianProduct"],
        severity: Severity::Critical,
        trigger: Trigger::Always,
        issue: "Cartesian product: disconnected patterns are combined without a join condition",
        suggestion: "Connect the patterns through a relationship or add a predicate that joins them",
        impact: "Row count is the product of both inputs",
    },
    IdentityRule {
        operators: &["DirectedAllRelationshipsScan"],
        severity: Severity::Critical,
        trigger: Trigger::Always,
        issue: "Scanning all relationships in the database",
        suggestion: "Specify a relationship type or anchor the pattern on an indexed node",
        impact: "Cost grows with the total number of relationships",
    },
    IdentityRule {
        operators: &["NodeByLabelScan"],
        severity: Severity::High,
        trigger: Trigger::Always,
        issue: "Label scan: all nodes with the label are read before filtering",
        suggestion: "Create an index on the filtered property so the planner can seek instead of scan",
        impact: "Cost grows with the number of nodes carrying the label",
    },
    IdentityRule {
        operators: &["NodeIndexScan"],
        severity: Severity::High,
        trigger: Trigger::Always,
        issue: "Scanning the entire index instead of seeking into it",
        suggestion: "Use an equality or range predicate on the indexed property to enable an index seek",
        impact: "Every index entry is visited",
    },
    IdentityRule {
        operators: &["Expand"],
        severity: Severity::High,
        trigger: Trigger::RowsAbove(10_000),
        issue: "Expanding many relationships",
        suggestion: "Filter the start nodes earlier or restrict relationship types and direction",
        impact: "Intermediate results grow with node degree",
    },
    IdentityRule {
        operators: &["Filter"],
        severity: Severity::Medium,
        trigger: Trigger::RowsAbove(10_000),
        issue: "Large filter applied after data retrieval",
        suggestion: "Move the predicate into an indexed lookup so fewer rows reach the filter",
        impact: "Rows are produced only to be discarded",
    },
    IdentityRule {
        operators: &["Sort"],
        severity: Severity::Medium,
        trigger: Trigger::RowsAbove(1_000),
        issue: "Large in-memory sort",
        suggestion: "Add LIMIT after ORDER BY or sort on an indexed property",
        impact: "All rows are held in memory before the first result",
    },
    IdentityRule {
        operators: &["Aggregate"],
        severity: Severity::Medium,
        trigger: Trigger::RowsAbove(10_000),
        issue: "Large aggregation",
        suggestion: "Reduce the input with filters before aggregating or aggregate in stages with WITH",
        impact: "Grouping state grows with the number of input rows",
    },
    IdentityRule {
        operators: &["Unwind"],
        severity: Severity::Medium,
        trigger: Trigger::RowsAbove(1_000),
        issue: "Large unwind",
        suggestion: "Batch the list or process it with CALL { ... } IN TRANSACTIONS",
        impact: "Every list element becomes a row in the pipeline",
    },
    IdentityRule {
        operators: &["Limit"],
        severity: Severity::Medium,
        trigger: Trigger::RowsAbove(10_000),
        issue: "Large amount of processing before the limit is applied",
        suggestion: "Apply LIMIT earlier in the query, before expensive expansions",
        impact: "Rows are computed that the limit throws away",
    },
    IdentityRule {
        operators: &["Skip"],
        severity: Severity::Medium,
        trigger: Trigger::RowsAbove(1_000),
        issue: "Expensive skip",
        suggestion: "Use keyset pagination on an indexed property instead of large SKIP values",
        impact: "Skipped rows are still produced",
    },
    IdentityRule {
        operators: &["NodeHashJoin", "NodeLeftHashJoin"],
        severity: Severity::Medium,
        trigger: Trigger::RowsAbove(10_000),
        issue: "Large hash join",
        suggestion: "Reduce both join inputs or use a join hint on a more selective node",
        impact: "The build side is held in memory",
    },
    IdentityRule {
        operators: &["Apply"],
        severity: Severity::Medium,
        trigger: Trigger::Always,
        issue: "Subquery executed once per input row",
        suggestion: "Reduce the rows entering the subquery or rewrite it as a join",
        impact: "Subquery cost is multiplied by the outer row count",
    },
];

/// Rule for a clean operator name, if any.
pub fn identity_rule(operator: &str) -> Option<&'static IdentityRule> {
    IDENTITY_RULES
        .iter()
        .find(|rule| rule.operators.contains(&operator))
}

/// Always-on rule: excessive storage access on any operator.
pub fn high_db_hits_issue(record: &OperatorRecord) -> Option<PerformanceIssue> {
    if record.db_hits <= HIGH_DB_HITS_THRESHOLD {
        return None;
    }

    Some(PerformanceIssue {
        severity: Severity::High,
        operator: record.clean_operator().to_string(),
        issue: format!("High database hits ({})", record.db_hits),
        suggestion: "Check for missing indexes or property reads that could be deferred".to_string(),
        impact: "Storage access dominates the operator's cost".to_string(),
        depth: record.depth,
        estimated_rows: Some(record.estimated_rows),
        db_hits: Some(record.db_hits),
    })
}

/// All findings for a single operator: identity rule first, then db hits.
pub fn evaluate(record: &OperatorRecord) -> Vec<PerformanceIssue> {
    let identity = identity_rule(record.clean_operator()).and_then(|rule| rule.evaluate(record));
    identity
        .into_iter()
        .chain(high_db_hits_issue(record))
        .collect()
}

/// Performance tags for a single operator.
pub fn performance_indicators(operator: &str, estimated_rows: u64, db_hits: u64) -> BTreeSet<Indicator> {
    let mut indicators = BTreeSet::new();

    if estimated_rows > HIGH_ROW_COUNT_THRESHOLD {
        indicators.insert(Indicator::HighRowCount);
    }
    if db_hits > HIGH_DB_HITS_THRESHOLD {
        indicators.insert(Indicator::HighDbHits);
    }
    if matches!(operator, "AllNodesScan" | "UndirectedAllRelationshipsScan") {
        indicators.insert(Indicator::FullScan);
    }
    if operator == "CartesianProduct" {
        indicators.insert(Indicator::CartesianProduct);
    }
    if operator.contains("Index") {
        indicators.insert(Indicator::IndexUsage);
    }
    if operator.contains("Eager") {
        indicators.insert(Indicator::EagerOperation);
    }

    indicators
}

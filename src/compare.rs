//! Before/after comparison of two execution plans.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::plan::{clean_operator_name, PlanNode};

/// Message emitted when no improvement check fires.
pub const NO_IMPROVEMENT: &str = "Query structure maintained";

/// Which direction of change counts as an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    /// Fewer occurrences in the optimized plan.
    Fewer,
    /// More occurrences in the optimized plan.
    More,
}

/// Improvement checks, in emission order.
const IMPROVEMENT_CHECKS: &[(&str, Change, &str)] = &[
    ("AllNodesScan", Change::Fewer, "Reduced full scans"),
    ("CartesianProduct", Change::Fewer, "Eliminated cartesian products"),
    ("DirectedAllRelationshipsScan", Change::Fewer, "Reduced relationship scans"),
    ("NodeByLabelScan", Change::More, "Added label-based scans"),
    ("NodeIndexScan", Change::More, "Utilized index scans"),
    ("Limit", Change::More, "Added result limiting"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub original_operators: BTreeMap<String, usize>,
    pub optimized_operators: BTreeMap<String, usize>,
    pub original_estimated_rows: u64,
    pub optimized_estimated_rows: u64,
    pub improvements: Vec<String>,
}

/// Occurrences of each raw operator name in the plan.
pub fn count_operators(plan: &PlanNode) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for (node, _) in plan.iter() {
        *counts.entry(node.operator.clone()).or_insert(0) += 1;
    }
    counts
}

/// Sum of `estimated_rows` over every node, the root included.
pub fn estimate_total_rows(plan: &PlanNode) -> u64 {
    plan.iter()
        .map(|(node, _)| node.estimated_rows)
        .fold(0, u64::saturating_add)
}

/// Total count for a clean operator name, across runtime-suffixed keys.
fn count_of(histogram: &BTreeMap<String, usize>, operator: &str) -> usize {
    histogram
        .iter()
        .filter(|(name, _)| clean_operator_name(name) == operator)
        .map(|(_, count)| count)
        .sum()
}

/// Improvement statements derived from two operator histograms.
pub fn identify_improvements(
    original: &BTreeMap<String, usize>,
    optimized: &BTreeMap<String, usize>,
) -> Vec<String> {
    let improvements: Vec<String> = IMPROVEMENT_CHECKS
        .iter()
        .filter(|(operator, change, _)| {
            let before = count_of(original, operator);
            let after = count_of(optimized, operator);
            match change {
                Change::Fewer => before > after,
                Change::More => after > before,
            }
        })
        .map(|(_, _, message)| message.to_string())
        .collect();

    if improvements.is_empty() {
        vec![NO_IMPROVEMENT.to_string()]
    } else {
        improvements
    }
}

pub fn compare(original: &PlanNode, optimized: &PlanNode) -> ComparisonResult {
    let original_operators = count_operators(original);
    let optimized_operators = count_operators(optimized);
    let improvements = identify_improvements(&original_operators, &optimized_operators);

    ComparisonResult {
        original_estimated_rows: estimate_total_rows(original),
        optimized_estimated_rows: estimate_total_rows(optimized),
        original_operators,
        optimized_operators,
        improvements,
    }
}

//! Rule-based plan analysis.
//!
//! Turns a normalized plan (or its flat operator records) plus the query text
//! into a [`QueryAnalysis`]:
//!
//! ```text
//! PlanNode ──flatten──► [OperatorRecord] ──► analyze_operators ──► [OperatorInfo]
//!    │                                                                  │
//!    └──► analyze_plan_issues ──► [PerformanceIssue]                    │
//!                                        │                              │
//! query text ──► query::* / recommend::* │                              │
//!                        │               ▼                              ▼
//!                        └──────────► QueryAnalysis ◄───────────────────┘
//! ```
//!
//! Everything here is pure and synchronous. Malformed input never fails: it
//! was already defaulted by the normalizer.

pub mod query;
pub mod recommend;
pub mod rules;
pub mod types;

pub use query::{
    analyze_performance_characteristics, assess_query_complexity, classify_query_type,
    complexity_score, identify_query_patterns, query_metadata, Complexity, QueryMetadata,
    QueryType,
};
pub use recommend::{best_practices, index_recommendations, optimization_opportunities};
pub use rules::{IdentityRule, Trigger, IDENTITY_RULES};
pub use types::{
    Indicator, OperatorInfo, PerformanceIssue, PlanSummary, QueryAnalysis, Severity,
};

use std::collections::BTreeSet;

use crate::plan::{
    clean_operator_name, is_eager_operator, is_leaf_operator, is_updating_operator,
    OperatorRecord, PlanNode,
};

/// Classify each flat operator record.
pub fn analyze_operators(records: &[OperatorRecord]) -> Vec<OperatorInfo> {
    records
        .iter()
        .map(|record| {
            let clean = clean_operator_name(&record.operator);
            OperatorInfo {
                clean_operator: clean.to_string(),
                is_leaf: is_leaf_operator(clean),
                is_updating: is_updating_operator(clean),
                is_eager: is_eager_operator(clean),
                performance_indicators: rules::performance_indicators(
                    clean,
                    record.estimated_rows,
                    record.db_hits,
                ),
                record: record.clone(),
            }
        })
        .collect()
}

/// Findings for every node of the plan, in pre-order.
pub fn analyze_plan_issues(root: &PlanNode) -> Vec<PerformanceIssue> {
    analyze_issues(&root.flatten())
}

/// Findings for already-flattened records, in record order.
pub fn analyze_issues(records: &[OperatorRecord]) -> Vec<PerformanceIssue> {
    records.iter().flat_map(rules::evaluate).collect()
}

/// Operator counts and plan-wide totals.
pub fn summarize(operators: &[OperatorInfo]) -> PlanSummary {
    PlanSummary {
        total_operators: operators.len(),
        leaf_operators: operators.iter().filter(|op| op.is_leaf).count(),
        updating_operators: operators.iter().filter(|op| op.is_updating).count(),
        eager_operators: operators.iter().filter(|op| op.is_eager).count(),
        estimated_total_rows: operators
            .iter()
            .map(|op| op.record.estimated_rows)
            .fold(0, u64::saturating_add),
        estimated_db_hits: operators
            .iter()
            .map(|op| op.record.db_hits)
            .fold(0, u64::saturating_add),
    }
}

/// Union of the per-operator indicators.
pub fn extract_performance_indicators(operators: &[OperatorInfo]) -> BTreeSet<Indicator> {
    operators
        .iter()
        .flat_map(|op| op.performance_indicators.iter().copied())
        .collect()
}

/// Full analysis from flat operator records.
pub fn analyze_query(query: &str, records: &[OperatorRecord]) -> QueryAnalysis {
    let operators = analyze_operators(records);
    let performance_issues = analyze_issues(records);
    let summary = summarize(&operators);

    QueryAnalysis {
        query: query.to_string(),
        query_type: classify_query_type(query),
        complexity: assess_query_complexity(query),
        optimization_opportunities: optimization_opportunities(&performance_issues),
        index_recommendations: index_recommendations(query),
        query_patterns: identify_query_patterns(query),
        performance_characteristics: analyze_performance_characteristics(query),
        best_practices: best_practices(query),
        estimated_total_rows: summary.estimated_total_rows,
        estimated_db_hits: summary.estimated_db_hits,
        performance_indicators: extract_performance_indicators(&operators),
        metadata: query_metadata(query),
        performance_issues,
        operators,
        summary,
    }
}

/// Full analysis of a plan tree.
pub fn analyze_plan(query: &str, root: &PlanNode) -> QueryAnalysis {
    analyze_query(query, &root.flatten())
}

//! Result types produced by the analyzer.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::query::{Complexity, QueryMetadata, QueryType};
use crate::plan::OperatorRecord;

/// Severity of a performance finding, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-operator performance tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    HighRowCount,
    HighDbHits,
    FullScan,
    CartesianProduct,
    IndexUsage,
    EagerOperation,
}

impl Indicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::HighRowCount => "high_row_count",
            Indicator::HighDbHits => "high_db_hits",
            Indicator::FullScan => "full_scan",
            Indicator::CartesianProduct => "cartesian_product",
            Indicator::IndexUsage => "index_usage",
            Indicator::EagerOperation => "eager_operation",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operator record together with its classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorInfo {
    #[serde(flatten)]
    pub record: OperatorRecord,
    pub clean_operator: String,
    pub is_leaf: bool,
    pub is_updating: bool,
    pub is_eager: bool,
    pub performance_indicators: BTreeSet<Indicator>,
}

/// A single finding attached to a plan operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceIssue {
    pub severity: Severity,
    pub operator: String,
    pub issue: String,
    pub suggestion: String,
    pub impact: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_rows: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_hits: Option<u64>,
}

/// Operator counts and plan-wide totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub total_operators: usize,
    pub leaf_operators: usize,
    pub updating_operators: usize,
    pub eager_operators: usize,
    pub estimated_total_rows: u64,
    pub estimated_db_hits: u64,
}

/// Everything the advisor knows about one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnalysis {
    pub query: String,
    pub query_type: QueryType,
    pub complexity: Complexity,
    pub performance_issues: Vec<PerformanceIssue>,
    pub optimization_opportunities: Vec<String>,
    pub index_recommendations: Vec<String>,
    pub query_patterns: Vec<String>,
    pub performance_characteristics: String,
    pub best_practices: Vec<String>,
    pub estimated_total_rows: u64,
    pub estimated_db_hits: u64,
    pub operators: Vec<OperatorInfo>,
    pub summary: PlanSummary,
    pub performance_indicators: BTreeSet<Indicator>,
    pub metadata: QueryMetadata,
}

impl QueryAnalysis {
    /// Issues at exactly the given severity.
    pub fn issues_with_severity(&self, severity: Severity) -> impl Iterator<Item = &PerformanceIssue> {
        self.performance_issues
            .iter()
            .filter(move |issue| issue.severity == severity)
    }

    /// Most urgent severity present, if any issue was found.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.performance_issues.iter().map(|issue| issue.severity).min()
    }
}

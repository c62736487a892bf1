//! Markdown rendering of analyses and comparisons.
//!
//! Each report is a [`fmt::Display`] wrapper, so the text can be written to
//! any formatter or turned into a `String` with the `render_*` helpers.

use std::fmt::{self, Display, Formatter};

use crate::advisor::OptimizationReport;
use crate::analyzer::{OperatorInfo, QueryAnalysis};
use crate::compare::ComparisonResult;
use crate::neo4j::QueryPlan;

/// Cypher operator reference linked from every report.
pub const OPERATOR_REFERENCE: &str =
    "https://neo4j.com/docs/cypher-manual/current/planning-and-tuning/operators/";

pub fn render_analysis(analysis: &QueryAnalysis) -> String {
    AnalysisReport(analysis).to_string()
}

pub fn render_plan_report(plan: &QueryPlan, analysis: &QueryAnalysis) -> String {
    PlanReport { plan, analysis }.to_string()
}

pub fn render_optimization(report: &OptimizationReport) -> String {
    OptimizationSummary(report).to_string()
}

pub fn render_comparison(comparison: &ComparisonResult) -> String {
    ComparisonReport(comparison).to_string()
}

/// Format an integer with `,` thousands separators.
pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn write_list<I, T>(f: &mut Formatter<'_>, items: I, empty: &str) -> fmt::Result
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    let mut any = false;
    for item in items {
        writeln!(f, "- {item}")?;
        any = true;
    }
    if !any {
        writeln!(f, "{empty}")?;
    }
    Ok(())
}

fn write_execution_time(f: &mut Formatter<'_>, plan: &QueryPlan) -> fmt::Result {
    match plan.execution_time_ms {
        Some(ms) => writeln!(f, "**Execution Time**: {}ms", group_digits(ms)),
        None => writeln!(f, "**Execution Time**: N/A"),
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Structured context for a single analysis.
pub struct AnalysisReport<'a>(pub &'a QueryAnalysis);

impl Display for AnalysisReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let a = self.0;

        writeln!(f, "# Neo4j Query Analysis")?;
        writeln!(f)?;
        writeln!(f, "## Query Information")?;
        writeln!(f, "- **Query**: {}", a.query)?;
        writeln!(f, "- **Type**: {} query", a.query_type)?;
        writeln!(f, "- **Complexity**: {}", a.complexity)?;
        if a.query_patterns.is_empty() {
            writeln!(f, "- **Patterns**: none")?;
        } else {
            writeln!(f, "- **Patterns**: {}", a.query_patterns.join(", "))?;
        }
        writeln!(f)?;

        writeln!(f, "## Execution Plan Summary")?;
        writeln!(f, "- **Total Operators**: {}", a.summary.total_operators)?;
        writeln!(f, "- **Leaf Operators**: {}", a.summary.leaf_operators)?;
        writeln!(f, "- **Updating Operators**: {}", a.summary.updating_operators)?;
        writeln!(f, "- **Eager Operators**: {}", a.summary.eager_operators)?;
        writeln!(
            f,
            "- **Estimated Total Rows**: {}",
            group_digits(a.summary.estimated_total_rows)
        )?;
        writeln!(
            f,
            "- **Estimated DB Hits**: {}",
            group_digits(a.summary.estimated_db_hits)
        )?;
        writeln!(f)?;

        writeln!(f, "## Performance Issues")?;
        if a.performance_issues.is_empty() {
            writeln!(f, "No performance issues detected")?;
        }
        for issue in &a.performance_issues {
            writeln!(
                f,
                "- **[{}] {}** (depth {}): {}",
                issue.severity, issue.operator, issue.depth, issue.issue
            )?;
            writeln!(f, "  - Suggestion: {}", issue.suggestion)?;
            writeln!(f, "  - Impact: {}", issue.impact)?;
        }
        writeln!(f)?;

        writeln!(f, "## Optimization Opportunities")?;
        if a.optimization_opportunities.is_empty() {
            writeln!(f, "None")?;
        }
        for (i, opportunity) in a.optimization_opportunities.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, opportunity)?;
        }
        writeln!(f)?;

        writeln!(f, "## Index Recommendations")?;
        if a.index_recommendations.is_empty() {
            writeln!(f, "None")?;
        } else {
            writeln!(f, "```cypher")?;
            for statement in &a.index_recommendations {
                writeln!(f, "{statement};")?;
            }
            writeln!(f, "```")?;
        }
        writeln!(f)?;

        writeln!(f, "## Best Practices")?;
        write_list(f, &a.best_practices, "None")?;
        writeln!(f)?;

        writeln!(f, "## Performance Indicators")?;
        write_list(f, &a.performance_indicators, "- none")?;
        writeln!(f)?;

        writeln!(f, "## Query Metadata")?;
        writeln!(f, "- **Has WHERE clause**: {}", yes_no(a.metadata.has_where_clause))?;
        writeln!(f, "- **Has ORDER BY**: {}", yes_no(a.metadata.has_order_by))?;
        writeln!(f, "- **Has LIMIT**: {}", yes_no(a.metadata.has_limit))?;
        writeln!(f, "- **Has Aggregation**: {}", yes_no(a.metadata.has_aggregation))?;
        writeln!(f, "- **Has Relationships**: {}", yes_no(a.metadata.has_relationships))?;
        writeln!(f)?;

        writeln!(f, "## Operator Details")?;
        if a.operators.is_empty() {
            writeln!(f, "No operators found")?;
        }
        for (i, op) in a.operators.iter().enumerate() {
            write_operator(f, i + 1, op)?;
        }
        writeln!(f)?;

        writeln!(f, "## Performance Characteristics")?;
        writeln!(f, "{}", a.performance_characteristics)?;
        writeln!(f)?;
        writeln!(f, "Reference: {OPERATOR_REFERENCE}")
    }
}

fn write_operator(f: &mut Formatter<'_>, position: usize, op: &OperatorInfo) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "### Operator {}: {}", position, op.record.operator)?;
    writeln!(f, "- **Type**: {}", op.clean_operator)?;
    writeln!(f, "- **Estimated Rows**: {}", group_digits(op.record.estimated_rows))?;
    writeln!(f, "- **DB Hits**: {}", group_digits(op.record.db_hits))?;
    writeln!(f, "- **Depth**: {}", op.record.depth)?;
    writeln!(f, "- **Is Leaf**: {}", yes_no(op.is_leaf))?;
    writeln!(f, "- **Is Updating**: {}", yes_no(op.is_updating))?;
    writeln!(f, "- **Is Eager**: {}", yes_no(op.is_eager))?;
    let indicators: Vec<&str> = op.performance_indicators.iter().map(|i| i.as_str()).collect();
    if indicators.is_empty() {
        writeln!(f, "- **Performance Indicators**: none")
    } else {
        writeln!(f, "- **Performance Indicators**: {}", indicators.join(", "))
    }
}

// ============================================================================
// Plan report (analyze tool)
// ============================================================================

pub struct PlanReport<'a> {
    pub plan: &'a QueryPlan,
    pub analysis: &'a QueryAnalysis,
}

impl Display for PlanReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let summary = &self.analysis.summary;

        writeln!(f, "# Query Plan Analysis")?;
        writeln!(f)?;
        writeln!(f, "## Query")?;
        writeln!(f, "```cypher")?;
        writeln!(f, "{}", self.plan.query)?;
        writeln!(f, "```")?;
        writeln!(f)?;

        writeln!(f, "## Execution Plan")?;
        write_execution_time(f, self.plan)?;
        writeln!(f)?;
        writeln!(f, "### Plan Structure")?;
        writeln!(f, "```json")?;
        let json = serde_json::to_string_pretty(&self.plan.explain_plan).map_err(|_| fmt::Error)?;
        writeln!(f, "{json}")?;
        writeln!(f, "```")?;
        writeln!(f)?;

        writeln!(f, "## Performance Analysis")?;
        writeln!(f, "**Total Operators**: {}", summary.total_operators)?;
        writeln!(f, "**Leaf Operators**: {}", summary.leaf_operators)?;
        writeln!(f, "**Eager Operators**: {}", summary.eager_operators)?;
        writeln!(f, "**Estimated Total Rows**: {}", group_digits(summary.estimated_total_rows))?;
        writeln!(f, "**Estimated DB Hits**: {}", group_digits(summary.estimated_db_hits))?;
        writeln!(f)?;

        write!(f, "{}", AnalysisReport(self.analysis))
    }
}

// ============================================================================
// Comparison / optimization (optimize tool)
// ============================================================================

pub struct ComparisonReport<'a>(pub &'a ComparisonResult);

impl Display for ComparisonReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = self.0;

        writeln!(f, "### Original Plan Operators")?;
        write_list(
            f,
            c.original_operators
                .iter()
                .map(|(op, count)| format!("**{op}**: {count}")),
            "- none",
        )?;
        writeln!(f)?;
        writeln!(f, "### Optimized Plan Operators")?;
        write_list(
            f,
            c.optimized_operators
                .iter()
                .map(|(op, count)| format!("**{op}**: {count}")),
            "- none",
        )?;
        writeln!(f)?;

        writeln!(f, "## Improvements")?;
        write_list(f, &c.improvements, "None")?;
        writeln!(f)?;

        writeln!(f, "## Performance Comparison")?;
        writeln!(
            f,
            "- **Row Estimation Change**: {} -> {}",
            group_digits(c.original_estimated_rows),
            group_digits(c.optimized_estimated_rows)
        )
    }
}

pub struct OptimizationSummary<'a>(pub &'a OptimizationReport);

impl Display for OptimizationSummary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let r = self.0;

        writeln!(f, "# Neo4j Query Optimization Analysis")?;
        writeln!(f)?;
        writeln!(f, "## Original Query")?;
        writeln!(f, "```cypher")?;
        writeln!(f, "{}", r.original_query)?;
        writeln!(f, "```")?;
        writeln!(f)?;
        writeln!(f, "## Optimized Query")?;
        writeln!(f, "```cypher")?;
        writeln!(f, "{}", r.optimized_query)?;
        writeln!(f, "```")?;
        writeln!(f)?;

        writeln!(f, "## Plan Comparison")?;
        write_execution_time(f, &r.original_plan)?;
        writeln!(
            f,
            "**Estimated Total Rows**: {} (original), {} (optimized)",
            group_digits(r.comparison.original_estimated_rows),
            group_digits(r.comparison.optimized_estimated_rows)
        )?;
        writeln!(f)?;
        write!(f, "{}", ComparisonReport(&r.comparison))?;
        writeln!(f)?;

        writeln!(f, "## Next Steps")?;
        writeln!(f, "1. Test the optimized query with your actual data")?;
        writeln!(f, "2. Create the recommended indexes where they match your workload")?;
        writeln!(f, "3. Monitor query execution times in production")?;
        writeln!(f, "4. Adjust LIMIT values based on your actual needs")?;
        writeln!(f)?;

        write!(f, "{}", AnalysisReport(&r.original_analysis))
    }
}

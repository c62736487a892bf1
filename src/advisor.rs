//! End-to-end pipelines behind the two tools.
//!
//! ```text
//! analyze:  query ──► query_plan ──► analyze_plan ──► PlanAnalysis
//!
//! optimize: query ──► query_plan ──┬─► analyze_plan ─────────────┐
//!             │                    │                             ├─► OptimizationReport
//!             └─► rewrite ──► query_plan ──► compare(explain) ───┘
//! ```

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::analyzer::{analyze_plan, QueryAnalysis};
use crate::compare::{compare, ComparisonResult};
use crate::config::AnalysisSettings;
use crate::neo4j::{ClientError, PlanProvider, QueryPlan};
use crate::rewrite::rewrite;

#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Required query text absent or blank.
    #[error("Query is required")]
    MissingInput,

    /// The database could not produce a plan.
    #[error("Failed to get query plan: {0}")]
    Upstream(#[from] ClientError),
}

/// Result of the analyze pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanAnalysis {
    pub plan: QueryPlan,
    pub analysis: QueryAnalysis,
}

/// Result of the optimize pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationReport {
    pub original_query: String,
    pub optimized_query: String,
    pub original_plan: QueryPlan,
    pub optimized_plan: QueryPlan,
    pub comparison: ComparisonResult,
    pub original_analysis: QueryAnalysis,
    pub optimized_analysis: QueryAnalysis,
}

/// Runs the pipelines against a plan provider.
#[derive(Clone)]
pub struct Advisor {
    provider: Arc<dyn PlanProvider>,
    settings: AnalysisSettings,
}

impl Advisor {
    pub fn new(provider: Arc<dyn PlanProvider>, settings: AnalysisSettings) -> Self {
        Self { provider, settings }
    }

    /// Collect and analyze the plan of one query.
    pub async fn analyze(
        &self,
        query: &str,
        database: Option<&str>,
    ) -> Result<PlanAnalysis, AdvisorError> {
        let query = require_query(query)?;

        let plan = self
            .provider
            .query_plan(query, database, &self.settings)
            .await?;
        let analysis = analyze_plan(query, plan.best_plan());

        tracing::info!(
            query_type = %analysis.query_type,
            issues = analysis.performance_issues.len(),
            "analyzed query"
        );

        Ok(PlanAnalysis { plan, analysis })
    }

    /// Rewrite the query and compare the plans before and after.
    pub async fn optimize(
        &self,
        query: &str,
        database: Option<&str>,
    ) -> Result<OptimizationReport, AdvisorError> {
        let original = self.analyze(query, database).await?;

        let optimized_query = rewrite(query);
        tracing::debug!(%optimized_query, "rewrote query");
        let optimized = self.analyze(&optimized_query, database).await?;

        let comparison = compare(&original.plan.explain_plan, &optimized.plan.explain_plan);

        Ok(OptimizationReport {
            original_query: original.plan.query.clone(),
            optimized_query,
            original_plan: original.plan,
            optimized_plan: optimized.plan,
            comparison,
            original_analysis: original.analysis,
            optimized_analysis: optimized.analysis,
        })
    }
}

fn require_query(query: &str) -> Result<&str, AdvisorError> {
    let query = query.trim();
    if query.is_empty() {
        Err(AdvisorError::MissingInput)
    } else {
        Ok(query)
    }
}

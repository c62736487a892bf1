//! Plan collection from Neo4j.
//!
//! The analysis core never talks to the database. Everything that does lives
//! here, behind the [`PlanProvider`] trait:
//!
//! ```text
//! Advisor ──► PlanProvider::query_plan ──► explain ──► PlanNode
//!                                      └─► profile ──► PlanNode + elapsed
//! ```
//!
//! [`Neo4jHttpClient`] is the production implementation. Tests substitute an
//! in-memory provider.

mod client;
mod error;
pub mod protocol;

pub use client::Neo4jHttpClient;
pub use error::{ClientError, ClientResult};

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::analyzer::{classify_query_type, QueryType};
use crate::config::AnalysisSettings;
use crate::plan::PlanNode;

/// Plans collected for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryPlan {
    pub query: String,
    /// Planner estimates from EXPLAIN.
    pub explain_plan: PlanNode,
    /// Actual rows and db hits from PROFILE, when it ran.
    pub profile_plan: Option<PlanNode>,
    /// Wall-clock time of the PROFILE run.
    pub execution_time_ms: Option<u64>,
}

impl QueryPlan {
    /// The most informative plan: PROFILE when available, else EXPLAIN.
    pub fn best_plan(&self) -> &PlanNode {
        self.profile_plan.as_ref().unwrap_or(&self.explain_plan)
    }
}

/// Source of execution plans.
#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// Plan the query without running it.
    async fn explain(&self, query: &str, database: Option<&str>) -> ClientResult<PlanNode>;

    /// Run the query with profiling; returns the annotated plan and elapsed time.
    async fn profile(&self, query: &str, database: Option<&str>)
        -> ClientResult<(PlanNode, Duration)>;

    /// Check that the database is reachable and the credentials work.
    async fn verify(&self) -> ClientResult<()>;

    /// EXPLAIN, then PROFILE when the settings allow it.
    ///
    /// A failing EXPLAIN is an error. A failing PROFILE is logged and the
    /// EXPLAIN plan is returned alone.
    async fn query_plan(
        &self,
        query: &str,
        database: Option<&str>,
        settings: &AnalysisSettings,
    ) -> ClientResult<QueryPlan> {
        let explain_plan = self.explain(query, database).await?;

        let mut plan = QueryPlan {
            query: query.to_string(),
            explain_plan,
            profile_plan: None,
            execution_time_ms: None,
        };

        if !should_profile(query, settings) {
            tracing::debug!("skipping PROFILE");
            return Ok(plan);
        }

        match self.profile(query, database).await {
            Ok((profile_plan, elapsed)) => {
                plan.profile_plan = Some(profile_plan);
                plan.execution_time_ms = Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
            }
            Err(err) => {
                tracing::warn!(error = %err, "PROFILE failed, using EXPLAIN plan only");
            }
        }

        Ok(plan)
    }
}

/// Provider used when no connection could be configured.
///
/// Every call fails with [`ClientError::NotConfigured`], so the server can
/// still start and report the problem per request.
#[derive(Debug, Clone)]
pub struct Unconfigured {
    reason: String,
}

impl Unconfigured {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> ClientError {
        ClientError::NotConfigured(self.reason.clone())
    }
}

#[async_trait]
impl PlanProvider for Unconfigured {
    async fn explain(&self, _query: &str, _database: Option<&str>) -> ClientResult<PlanNode> {
        Err(self.error())
    }

    async fn profile(
        &self,
        _query: &str,
        _database: Option<&str>,
    ) -> ClientResult<(PlanNode, Duration)> {
        Err(self.error())
    }

    async fn verify(&self) -> ClientResult<()> {
        Err(self.error())
    }
}

/// PROFILE executes the query, so writes are only profiled on request.
pub fn should_profile(query: &str, settings: &AnalysisSettings) -> bool {
    settings.profile
        && (settings.profile_writes || classify_query_type(query) == QueryType::Read)
}

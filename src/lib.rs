//! # Cypher Advisor
//!
//! A rule-based advisor for Cypher execution plans.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        JSON-RPC over stdio  /  cypher-advisor CLI        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [advisor]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Neo4j (EXPLAIN / PROFILE) via PlanProvider   [neo4j]   │
//! └─────────────────────────────────────────────────────────┘
//!                          │ raw plan JSON
//!                          ▼ [plan::normalize]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  PlanNode tree  [plan]                   │
//! └─────────────────────────────────────────────────────────┘
//!            │                              │
//!            ▼ [analyzer]                   ▼ [compare]
//! ┌───────────────────────────┐  ┌──────────────────────────┐
//! │ QueryAnalysis             │  │ ComparisonResult         │
//! │ (issues, indicators,      │  │ (histograms, row totals, │
//! │  recommendations)         │  │  improvements)           │
//! └───────────────────────────┘  └──────────────────────────┘
//!                          │
//!                          ▼ [report]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Markdown report                       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The analysis core (`plan`, `analyzer`, `compare`, `rewrite`) is pure and
//! synchronous and never performs I/O.

pub mod advisor;
pub mod analyzer;
pub mod compare;
pub mod config;
pub mod logging;
pub mod neo4j;
pub mod plan;
pub mod report;
pub mod rewrite;
pub mod server;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::advisor::{Advisor, AdvisorError, OptimizationReport, PlanAnalysis};
    pub use crate::analyzer::{
        analyze_operators, analyze_plan, analyze_plan_issues, analyze_query, Complexity,
        Indicator, OperatorInfo, PerformanceIssue, QueryAnalysis, QueryType, Severity,
    };
    pub use crate::compare::{compare, ComparisonResult};
    pub use crate::neo4j::{PlanProvider, QueryPlan};
    pub use crate::plan::{normalize, normalize_value, OperatorRecord, PlanNode};
    pub use crate::rewrite::rewrite;
}

pub use analyzer::{analyze_plan, QueryAnalysis};
pub use compare::{compare, ComparisonResult};
pub use plan::{OperatorRecord, PlanNode};

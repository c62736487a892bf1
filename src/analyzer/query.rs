//! Lexical classification of raw Cypher text.
//!
//! None of this parses Cypher. Every check is a substring or regex probe on
//! the query text, and the case rules are part of the contract: some checks
//! look at the upper-cased text, others at the text as written.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Bracketed relationship patterns such as `[r:KNOWS]`.
static RELATIONSHIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("valid relationship regex"));

/// Relationship patterns counted towards complexity are capped at this many.
const MAX_RELATIONSHIP_SCORE: usize = 3;

const AGGREGATES: &[&str] = &["COUNT(", "SUM(", "AVG("];

/// Broad category of a query, by the clauses it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Write,
    Delete,
    Update,
    Read,
    Unknown,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Write => "write",
            QueryType::Delete => "delete",
            QueryType::Update => "update",
            QueryType::Read => "read",
            QueryType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    /// Bucket a raw complexity score.
    pub fn from_score(score: usize) -> Self {
        match score {
            0..=2 => Complexity::Simple,
            3..=5 => Complexity::Medium,
            _ => Complexity::Complex,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clause presence flags reported alongside the analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryMetadata {
    pub has_where_clause: bool,
    pub has_order_by: bool,
    pub has_limit: bool,
    pub has_aggregation: bool,
    pub has_relationships: bool,
}

fn has_aggregate(query: &str) -> bool {
    AGGREGATES.iter().any(|func| query.contains(func))
}

fn has_relationship_arrow(query: &str) -> bool {
    query.contains("-[") && query.contains("]->")
}

/// Classify a query. The first matching keyword group wins.
pub fn classify_query_type(query: &str) -> QueryType {
    let upper = query.to_uppercase();
    if upper.contains("CREATE") {
        QueryType::Write
    } else if upper.contains("DELETE") || upper.contains("REMOVE") {
        QueryType::Delete
    } else if upper.contains("SET") || upper.contains("MERGE") {
        QueryType::Update
    } else if upper.contains("MATCH") && upper.contains("RETURN") {
        QueryType::Read
    } else {
        QueryType::Unknown
    }
}

/// Raw complexity score behind [`assess_query_complexity`].
pub fn complexity_score(query: &str) -> usize {
    let upper = query.to_uppercase();
    let mut score = 0;

    for clause in ["MATCH", "WHERE", "ORDER BY", "LIMIT"] {
        if query.contains(clause) {
            score += 1;
        }
    }

    if has_aggregate(query) {
        score += 2;
    }
    if upper.contains("UNION") {
        score += 2;
    }
    if upper.contains("CASE") {
        score += 1;
    }
    if upper.contains("WITH") {
        score += 1;
    }

    let relationships = RELATIONSHIP_PATTERN.find_iter(query).count();
    score + relationships.min(MAX_RELATIONSHIP_SCORE)
}

pub fn assess_query_complexity(query: &str) -> Complexity {
    Complexity::from_score(complexity_score(query))
}

/// Structural patterns present in the query, in a fixed order.
pub fn identify_query_patterns(query: &str) -> Vec<String> {
    let upper = query.to_uppercase();
    let checks = [
        (query.contains("MATCH ("), "node matching"),
        (has_relationship_arrow(query), "relationship traversal"),
        (query.contains("WHERE"), "property filtering"),
        (query.contains("ORDER BY"), "result sorting"),
        (query.contains("LIMIT"), "result limiting"),
        (has_aggregate(query), "aggregation"),
        (upper.contains("UNION"), "query union"),
        (upper.contains("WITH"), "query chaining"),
    ];

    checks
        .into_iter()
        .filter(|(present, _)| *present)
        .map(|(_, pattern)| pattern.to_string())
        .collect()
}

/// Free-text warnings about the query shape, joined with `"; "`.
pub fn analyze_performance_characteristics(query: &str) -> String {
    let mut characteristics = Vec::new();

    if query.contains("MATCH (n)") && !query.contains(':') {
        characteristics.push("Full database scan - will be slow on large datasets");
    }
    if !query.contains("WHERE") {
        characteristics.push("No filtering - may return large result sets");
    }
    if !query.contains("LIMIT") {
        characteristics.push("No result limiting - potential for memory issues");
    }
    if query.contains("ORDER BY") {
        characteristics.push("Sorting operation - consider indexes on sorted properties");
    }
    if query.contains("COUNT(") || query.contains("SUM(") {
        characteristics.push("Aggregation operation - may be memory intensive");
    }
    if query.to_uppercase().contains("UNION") {
        characteristics.push("Query union - multiple result sets combined");
    }

    if characteristics.is_empty() {
        "Query appears well-structured".to_string()
    } else {
        characteristics.join("; ")
    }
}

pub fn query_metadata(query: &str) -> QueryMetadata {
    let upper = query.to_uppercase();
    QueryMetadata {
        has_where_clause: query.contains("WHERE"),
        has_order_by: query.contains("ORDER BY"),
        has_limit: query.contains("LIMIT"),
        has_aggregation: ["COUNT(", "SUM(", "AVG(", "MIN(", "MAX("]
            .iter()
            .any(|func| upper.contains(func)),
        has_relationships: has_relationship_arrow(query),
    }
}

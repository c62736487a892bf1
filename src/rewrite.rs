//! Token-level query nudges.
//!
//! This is not a Cypher rewriter. It substitutes a placeholder label into the
//! bare `MATCH (n)` pattern of queries that name no label or type at all, and
//! bounds unbounded queries with a default `LIMIT`. The result is meant to be EXPLAINed next to the original, not run
//! in its place.

/// Label substituted into unlabeled `MATCH (n)` patterns.
pub const PLACEHOLDER_LABEL: &str = "Node";

/// Row limit appended to queries that neither limit nor count.
pub const DEFAULT_LIMIT: u64 = 1000;

const UNLABELED_PATTERN: &str = "MATCH (n)";

/// Rewrite a query. Deterministic; applying it twice changes nothing more.
///
/// Any `:` in the query (a label, a relationship type, a map) leaves the
/// patterns untouched.
pub fn rewrite(query: &str) -> String {
    let query = query.trim();
    let mut rewritten = if query.contains(':') {
        query.to_string()
    } else {
        query.replace(UNLABELED_PATTERN, &format!("MATCH (n:{PLACEHOLDER_LABEL})"))
    };

    let upper = rewritten.to_uppercase();
    if !upper.contains("LIMIT") && !upper.contains("COUNT(") {
        rewritten.push_str(&format!(" LIMIT {DEFAULT_LIMIT}"));
    }

    rewritten
}

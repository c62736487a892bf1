//! Advice derived from the findings and the query text.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::types::PerformanceIssue;

/// `(var:Label` at the start of a node pattern.
static LABEL_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*([A-Za-z_]\w*)\s*:\s*`?([A-Za-z_]\w*)`?").expect("valid label regex")
});

/// `(var:Label {...})` node patterns with an inline property map.
static INLINE_PROPERTIES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*([A-Za-z_]\w*)\s*:\s*`?([A-Za-z_]\w*)`?[^)]*?\{([^}]*)\}")
        .expect("valid inline property regex")
});

/// Keys of an inline property map.
static MAP_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|,)\s*([A-Za-z_]\w*)\s*:").expect("valid map key regex"));

/// Body of a WHERE clause, up to the next clause keyword.
static WHERE_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\bWHERE\b(.*?)(?:\bRETURN\b|\bWITH\b|\bORDER\s+BY\b|\bOPTIONAL\b|\bMATCH\b|\bUNWIND\b|\bCALL\b|\bCREATE\b|\bMERGE\b|\bSET\b|\bDETACH\b|\bDELETE\b|\bLIMIT\b|\bSKIP\b|\bUNION\b|$)",
    )
    .expect("valid where regex")
});

/// `STARTS WITH` / `ENDS WITH`, fused so `WITH` does not end a WHERE clause.
static STRING_OPERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(STARTS|ENDS)\s+WITH\b").expect("valid string operator regex")
});

/// `var.prop` on the left of a comparison.
static PROPERTY_PREDICATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b([A-Za-z_]\w*)\.([A-Za-z_]\w*)\s*(?:<>|<=|>=|=|<|>|\bIN\b|\bSTARTS_WITH\b|\bENDS_WITH\b|\bCONTAINS\b|\bIS\s+NOT\s+NULL\b|\bIS\s+NULL\b)",
    )
    .expect("valid predicate regex")
});

static UNLABELED_MATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bMATCH\s*\(\s*[A-Za-z_]\w*\s*\)").expect("valid unlabeled match regex")
});

static LITERAL_PREDICATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bWHERE\b.*?(?:=|<|>)\s*(?:'|"|\d)"#).expect("valid literal regex")
});

static UNBOUNDED_VAR_LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\s*(?:\d+\s*\.\.\s*)?\]").expect("valid var-length regex")
});

/// Distinct issue suggestions, most urgent first.
///
/// Ordering is stable within a severity, so ties keep traversal order.
pub fn optimization_opportunities(issues: &[PerformanceIssue]) -> Vec<String> {
    let mut ranked: Vec<&PerformanceIssue> = issues.iter().collect();
    ranked.sort_by_key(|issue| issue.severity);

    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .filter(|issue| seen.insert(issue.suggestion.as_str()))
        .map(|issue| issue.suggestion.clone())
        .collect()
}

/// `CREATE INDEX` statements for labeled properties the query filters on.
pub fn index_recommendations(query: &str) -> Vec<String> {
    let fused = STRING_OPERATOR.replace_all(query, "${1}_WITH");
    let query = fused.as_ref();

    let mut labels: HashMap<&str, &str> = HashMap::new();
    for caps in LABEL_BINDING.captures_iter(query) {
        if let (Some(var), Some(label)) = (caps.get(1), caps.get(2)) {
            labels.entry(var.as_str()).or_insert(label.as_str());
        }
    }

    let mut candidates: Vec<(&str, &str)> = Vec::new();

    for caps in INLINE_PROPERTIES.captures_iter(query) {
        let (Some(var), Some(body)) = (caps.get(1), caps.get(3)) else {
            continue;
        };
        for key in MAP_KEY.captures_iter(body.as_str()) {
            if let Some(prop) = key.get(1) {
                candidates.push((var.as_str(), prop.as_str()));
            }
        }
    }

    for clause in WHERE_CLAUSE.captures_iter(query) {
        let Some(body) = clause.get(1) else {
            continue;
        };
        for caps in PROPERTY_PREDICATE.captures_iter(body.as_str()) {
            if let (Some(var), Some(prop)) = (caps.get(1), caps.get(2)) {
                candidates.push((var.as_str(), prop.as_str()));
            }
        }
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter_map(|(var, prop)| labels.get(var).map(|label| (var, *label, prop)))
        .filter(|(_, label, prop)| seen.insert((*label, *prop)))
        .map(|(var, label, prop)| {
            format!("CREATE INDEX IF NOT EXISTS FOR ({var}:{label}) ON ({var}.{prop})")
        })
        .collect()
}

/// General Cypher advice triggered by the query text.
pub fn best_practices(query: &str) -> Vec<String> {
    let upper = query.to_uppercase();
    let has_limit = upper.contains("LIMIT");
    let mut practices = Vec::new();

    if UNLABELED_MATCH.is_match(query) {
        practices.push("Specify node labels in MATCH patterns so the planner can start from a label scan or index");
    }
    if !has_limit {
        practices.push("Bound result sets with LIMIT, or paginate large results");
    }
    if upper.contains("ORDER BY") && !has_limit {
        practices.push("Pair ORDER BY with LIMIT so the planner can use a top-k sort");
    }
    if LITERAL_PREDICATE.is_match(query) {
        practices.push("Use query parameters ($param) instead of literals to benefit from plan caching");
    }
    if upper.contains("UNION") && !upper.contains("UNION ALL") {
        practices.push("Prefer UNION ALL when duplicates are acceptable; UNION adds a distinct step");
    }
    if UNBOUNDED_VAR_LENGTH.is_match(query) {
        practices.push("Put an upper bound on variable-length relationships, e.g. [*1..5]");
    }

    if practices.is_empty() {
        practices.push("Query follows common Cypher best practices");
    }

    practices.into_iter().map(str::to_string).collect()
}

//! Static operator catalogs.
//!
//! Membership mirrors the Neo4j Cypher manual's operator reference. The sets
//! are built once and never mutated; classification is a plain lookup.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Operators that originate rows (scans and seeks).
static LEAF_OPERATORS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "AllNodesScan",
        "Argument",
        "ArgumentTracker",
        "AssertingMultiNodeIndexSeek",
        "AssertingMultiRelationshipIndexSeek",
        "AssertingSingleNodeIndexSeek",
        "AssertingSingleRelationshipIndexSeek",
        "DirectedAllRelationshipsScan",
        "DirectedRelationshipByElementIdSeek",
        "DirectedRelationshipByIdSeek",
        "DirectedRelationshipIndexContainsScan",
        "DirectedRelationshipIndexEndsWithScan",
        "DirectedRelationshipIndexScan",
        "DirectedRelationshipIndexSeek",
        "DirectedRelationshipIndexSeekByRange",
        "DirectedRelationshipTypeScan",
        "DirectedUnionRelationshipTypesScan",
        "NodeByElementIdSeek",
        "NodeByIdSeek",
        "NodeByLabelScan",
        "NodeIndexContainsScan",
        "NodeIndexEndsWithScan",
        "NodeIndexScan",
        "NodeIndexSeek",
        "NodeIndexSeekByRange",
        "NodeUniqueIndexSeek",
        "NodeUniqueIndexSeekByRange",
        "UndirectedAllRelationshipsScan",
        "UndirectedRelationshipByElementIdSeek",
        "UndirectedRelationshipByIdSeek",
        "UndirectedRelationshipIndexContainsScan",
        "UndirectedRelationshipIndexEndsWithScan",
        "UndirectedRelationshipIndexScan",
        "UndirectedRelationshipIndexSeek",
        "UndirectedRelationshipIndexSeekByRange",
        "UndirectedRelationshipTypeScan",
        "UndirectedUnionRelationshipTypesScan",
        "UnionNodeByLabelsScan",
    ])
});

/// Operators that write to the store.
static UPDATING_OPERATORS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "Create",
        "Delete",
        "MergeCreateNode",
        "MergeCreateRelationship",
        "RemoveLabels",
        "SetLabels",
        "SetNodeProperties",
        "SetNodeProperty",
        "SetProperties",
        "SetProperty",
        "SetRelationshipProperties",
        "SetRelationshipProperty",
    ])
});

/// Operators that materialize their whole input before emitting a row.
static EAGER_OPERATORS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "EagerAggregation",
        "EagerLimit",
        "EagerSort",
        "EagerUnion",
        "ValueHashJoin",
        "CartesianProduct",
    ])
});

/// Strip the runtime tag Neo4j appends to operator names (`Filter@neo4j`).
pub fn clean_operator_name(operator: &str) -> &str {
    match operator.split_once('@') {
        Some((name, _)) => name,
        None => operator,
    }
}

/// Returns true if the operator originates rows rather than consuming them.
pub fn is_leaf_operator(operator: &str) -> bool {
    LEAF_OPERATORS.contains(operator)
}

/// Returns true if the operator mutates stored data.
pub fn is_updating_operator(operator: &str) -> bool {
    UPDATING_OPERATORS.contains(operator)
}

/// Returns true if the operator is a pipeline breaker.
///
/// Any name containing `Eager` counts, in addition to the fixed catalog.
pub fn is_eager_operator(operator: &str) -> bool {
    EAGER_OPERATORS.contains(operator) || operator.contains("Eager")
}

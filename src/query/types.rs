//! Aggregation DSL types
//!
//! The subset of the index aggregation DSL this report emits. Every
//! field is optional and skipped when absent, so serialization yields
//! exactly the wire shape the index expects.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One aggregation node in the query tree
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Aggregation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<TermsAgg>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<NestedAgg>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<TermFilter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_nested: Option<ReverseNested>,

    /// Child aggregations
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "aggregations"
    )]
    pub aggs: Option<HashMap<String, Aggregation>>,
}

impl Aggregation {
    /// A flat terms aggregation
    pub fn terms(terms: TermsAgg) -> Self {
        Self {
            terms: Some(terms),
            ..Default::default()
        }
    }
}

/// Terms aggregation: count documents per distinct field value
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TermsAgg {
    pub field: String,
    pub size: usize,

    /// Restrict buckets to keys matching this pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,

    /// Lowest document count a bucket needs to be returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_doc_count: Option<u64>,
}

impl TermsAgg {
    pub fn new(field: impl Into<String>, size: usize) -> Self {
        Self {
            field: field.into(),
            size,
            include: None,
            min_doc_count: None,
        }
    }
}

/// Aggregation scoped to a nested sub-document array field
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NestedAgg {
    pub path: String,
}

/// Exact-term filter clause
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TermFilter {
    pub term: HashMap<String, String>,
}

/// Steps back out of a nested scope to aggregate at the parent
/// document level
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReverseNested {}

//! Builds the aggregation query from report arguments

use crate::params::{AggSpec, GroupField, ReportArgs};
use crate::query::types::{Aggregation, NestedAgg, ReverseNested, TermFilter, TermsAgg};
use std::collections::HashMap;

/// Maximum number of term buckets requested by default
pub const MAX_TERMS_SIZE: usize = 10_000;

/// Fixed bucket cap for the nested scheme lookup
const SCHEME_TERMS_SIZE: usize = 1_000;

/// Build the aggregation query for a report request
///
/// Without a grouping field this falls back to a flat terms
/// aggregation on `source`. A grouping field that parses as a scheme
/// descriptor replaces the flat `parent` aggregation with a nested
/// lookup over `subject`, filtered by `subject.scheme`.
pub fn build_aggregation_query(args: &ReportArgs) -> HashMap<String, Aggregation> {
    let group = args.aggs.as_ref().and_then(|a| a.group.as_ref());

    let (group, field) = match group.and_then(|g| g.field.as_deref().map(|f| (g, f))) {
        Some(pair) => pair,
        None => return default_aggregations(),
    };

    let mut parent = aggregation_for(group);

    if let Some(subgroup) = args.aggs.as_ref().and_then(|a| a.subgroup.as_ref()) {
        parent.aggs = Some(HashMap::from([(
            "child".to_string(),
            aggregation_for(subgroup),
        )]));
    }

    if let GroupField::Scheme(scheme) = GroupField::parse(field) {
        parent = scheme_aggregation(&scheme, parent.aggs.take());
    }

    HashMap::from([("parent".to_string(), parent)])
}

/// Default aggregation when no grouping field was requested
fn default_aggregations() -> HashMap<String, Aggregation> {
    HashMap::from([(
        "source".to_string(),
        Aggregation::terms(TermsAgg::new("source", MAX_TERMS_SIZE)),
    )])
}

/// One terms aggregation for a group or subgroup spec
///
/// An explicit filter other than `"all"` becomes an `include` pattern
/// with `min_doc_count = 0`, so buckets matching the pattern surface
/// even when empty.
fn aggregation_for(spec: &AggSpec) -> Aggregation {
    let mut terms = TermsAgg::new(
        spec.field.clone().unwrap_or_default(),
        spec.size.filter(|s| *s != 0).unwrap_or(MAX_TERMS_SIZE),
    );

    if let Some(filter) = spec.filter.as_deref().filter(|f| !f.is_empty() && *f != "all") {
        terms.include = Some(filter.to_string());
        terms.min_doc_count = Some(0);
    }

    Aggregation::terms(terms)
}

/// Nested aggregation for a scheme-descriptor grouping field
///
/// Counts `subject.qcode` terms inside the `subject` nested scope,
/// filtered to entries of the requested scheme. A subgroup aggregation
/// is relocated beneath a `reverse_nested` wrapper so its counts are
/// computed at the parent document level.
fn scheme_aggregation(scheme: &str, child: Option<HashMap<String, Aggregation>>) -> Aggregation {
    let mut qcode_terms = Aggregation::terms(TermsAgg::new("subject.qcode", SCHEME_TERMS_SIZE));

    if let Some(child) = child {
        qcode_terms.aggs = Some(HashMap::from([(
            "child_aggs".to_string(),
            Aggregation {
                reverse_nested: Some(ReverseNested {}),
                aggs: Some(child),
                ..Default::default()
            },
        )]));
    }

    let qcode_filter = Aggregation {
        filter: Some(TermFilter {
            term: HashMap::from([("subject.scheme".to_string(), scheme.to_string())]),
        }),
        aggs: Some(HashMap::from([("qcode_terms".to_string(), qcode_terms)])),
        ..Default::default()
    };

    Aggregation {
        nested: Some(NestedAgg {
            path: "subject".to_string(),
        }),
        aggs: Some(HashMap::from([("qcode_filter".to_string(), qcode_filter)])),
        ..Default::default()
    }
}

//! Bucket reduction from raw aggregation responses

use crate::params::ReportArgs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Count for one group: either a raw total or a per-subgroup breakdown
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GroupCount {
    Total(u64),
    Breakdown(HashMap<String, u64>),
}

impl GroupCount {
    /// Document count across all subgroups
    pub fn total(&self) -> u64 {
        match self {
            GroupCount::Total(n) => *n,
            GroupCount::Breakdown(map) => map.values().sum(),
        }
    }
}

/// The reduced publishing report
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Report {
    pub groups: HashMap<String, GroupCount>,

    /// Cross-group totals per subgroup key, present only when a
    /// subgroup was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgroups: Option<HashMap<String, u64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highcharts: Option<Vec<Value>>,
}

/// The two raw response layouts, resolved once at extraction time
///
/// A scheme-descriptor grouping field produces parent buckets beneath
/// `parent.qcode_filter.qcode_terms`; a plain field produces them
/// directly beneath `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Flat,
    NestedScheme,
}

impl ResponseShape {
    pub fn detect(raw: &Value) -> Self {
        if raw.pointer("/aggregations/parent/qcode_filter").is_some() {
            ResponseShape::NestedScheme
        } else {
            ResponseShape::Flat
        }
    }

    fn parent_buckets<'a>(&self, raw: &'a Value) -> &'a [Value] {
        let path = match self {
            ResponseShape::NestedScheme => "/aggregations/parent/qcode_filter/qcode_terms/buckets",
            ResponseShape::Flat => "/aggregations/parent/buckets",
        };
        raw.pointer(path)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Reduce a raw aggregation response into group/subgroup counts
///
/// Buckets without a usable key are skipped; missing document counts
/// are zero. Invariant: every `subgroups[s]` equals the sum of
/// `groups[g][s]` over all groups `g`.
pub fn generate_report(raw: &Value, args: &ReportArgs) -> Report {
    let has_children = args.subgroup_field().is_some();

    let mut report = Report {
        groups: HashMap::new(),
        subgroups: has_children.then(HashMap::new),
        highcharts: None,
    };

    for parent in ResponseShape::detect(raw).parent_buckets(raw) {
        let key = match bucket_key(parent) {
            Some(key) => key,
            None => continue,
        };

        if !has_children {
            report.groups.insert(key, GroupCount::Total(doc_count(parent)));
            continue;
        }

        let mut breakdown = HashMap::new();
        for child in child_buckets(parent) {
            let child_key = match bucket_key(child) {
                Some(key) => key,
                None => continue,
            };
            let count = doc_count(child);
            breakdown.insert(child_key.clone(), count);
            if let Some(subgroups) = report.subgroups.as_mut() {
                *subgroups.entry(child_key).or_insert(0) += count;
            }
        }
        report.groups.insert(key, GroupCount::Breakdown(breakdown));
    }

    report
}

/// The bucket key, or `None` when the bucket carries no usable key
///
/// The index can return housekeeping buckets without keys; empty
/// strings and numeric zero are skipped the same way.
fn bucket_key(bucket: &Value) -> Option<String> {
    match bucket.get("key") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn doc_count(bucket: &Value) -> u64 {
    bucket.get("doc_count").and_then(Value::as_u64).unwrap_or(0)
}

/// Child bucket list, covering both query shapes: a plain subgroup
/// sits under `child`, a reverse-nested one under `child_aggs.child`
fn child_buckets(parent: &Value) -> &[Value] {
    parent
        .pointer("/child/buckets")
        .or_else(|| parent.pointer("/child_aggs/child/buckets"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

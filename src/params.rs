//! Report request parameters
//!
//! These types mirror the JSON arguments a caller submits with a
//! report request. Everything is optional; defaults are applied at
//! query-build and reduction time rather than here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Caller-supplied report arguments
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportArgs {
    /// Grouping/subgrouping specs
    #[serde(default)]
    pub aggs: Option<ReportAggs>,

    /// Chart and date-range parameters
    #[serde(default)]
    pub params: Option<ReportParams>,

    /// Display labels, keyed by field name
    #[serde(default)]
    pub translations: HashMap<String, FieldTranslation>,
}

impl ReportArgs {
    /// The grouping field, if one was requested
    pub fn group_field(&self) -> Option<&str> {
        self.aggs
            .as_ref()
            .and_then(|a| a.group.as_ref())
            .and_then(|g| g.field.as_deref())
    }

    /// The subgrouping field, if one was requested
    pub fn subgroup_field(&self) -> Option<&str> {
        self.aggs
            .as_ref()
            .and_then(|a| a.subgroup.as_ref())
            .and_then(|g| g.field.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportAggs {
    #[serde(default)]
    pub group: Option<AggSpec>,
    #[serde(default)]
    pub subgroup: Option<AggSpec>,
}

/// One grouping spec: which field to bucket on and how
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AggSpec {
    /// Plain field name, or a JSON-encoded scheme descriptor
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub size: Option<usize>,
    /// Include pattern for bucket keys; `"all"` means no filtering
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportParams {
    #[serde(default)]
    pub chart: Option<ChartParams>,
    #[serde(default)]
    pub date_filter: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChartParams {
    #[serde(default, rename = "type")]
    pub chart_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

/// Display labels for one field: a title for the field itself and
/// per-bucket-key names
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FieldTranslation {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub names: HashMap<String, String>,
}

/// A grouping field, decided once at query-build time
///
/// Callers may pass either a plain field name or a JSON object with a
/// `scheme` key (a structured vocabulary descriptor). The two lead to
/// different aggregation queries, so the distinction is made explicit
/// here instead of re-parsing the raw string downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupField {
    Plain(String),
    Scheme(String),
}

impl GroupField {
    /// Classify a raw field parameter
    ///
    /// Input that is not valid JSON, or is JSON without a string
    /// `scheme` key, is a plain field name. This is the normal path,
    /// not an error.
    pub fn parse(raw: &str) -> Self {
        match scheme_of(raw) {
            Some(scheme) => GroupField::Scheme(scheme),
            None => GroupField::Plain(raw.to_string()),
        }
    }
}

/// Extract the scheme from a JSON-encoded scheme descriptor
///
/// Returns `None` for non-JSON input and for JSON values lacking a
/// string `scheme` key.
pub fn scheme_of(raw: &str) -> Option<String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map
            .get("scheme")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

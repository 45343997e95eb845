//! Content publishing analytics reports
//!
//! This crate reshapes aggregation results from an Elasticsearch-style
//! search index into a grouped/subgrouped count report and renders it
//! into a Highcharts configuration.
//!
//! # Pipeline
//!
//! - [`build_aggregation_query`] emits the aggregation query for the
//!   requested group/subgroup fields
//! - an external [`QueryExecutor`] runs it against the index
//! - [`generate_report`] reduces the raw buckets into counts
//! - [`generate_chart_config`] attaches a rendered chart configuration
//!
//! The report itself is request-scoped and stateless: one aggregation
//! response in, one report out.

pub mod chart;
pub mod error;
pub mod params;
pub mod query;
pub mod report;
pub mod router;
pub mod service;

mod endpoints;

pub use chart::{generate_chart_config, ChartBuilder};
pub use error::ReportError;
pub use params::{GroupField, ReportArgs};
pub use query::{build_aggregation_query, Aggregation, MAX_TERMS_SIZE};
pub use report::{generate_report, GroupCount, Report};
pub use router::report_router;
pub use service::{ContentPublishingReport, QueryExecutor, PRIVILEGE, REPOS};

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

//! Report execution over an external query executor

use crate::chart::generate_chart_config;
use crate::params::ReportArgs;
use crate::query::{build_aggregation_query, Aggregation};
use crate::report::{generate_report, Report};
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Privilege required to read this report
pub const PRIVILEGE: &str = "content_publishing_report";

/// Repositories the report queries
pub const REPOS: [&str; 2] = ["published", "archived"];

/// Runs an aggregation query against the search index
///
/// The index round trip (and its retry/timeout policy) lives behind
/// this seam; the report layer only sees the raw response.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn run_query(
        &self,
        repos: &[&str],
        aggregations: &HashMap<String, Aggregation>,
    ) -> Result<Value>;
}

/// The content publishing report service
pub struct ContentPublishingReport {
    executor: Arc<dyn QueryExecutor>,
}

impl ContentPublishingReport {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Build the aggregation query, run it, and reduce the response
    /// into a chart-ready report
    pub async fn run(&self, args: &ReportArgs) -> Result<Report> {
        let aggregations = build_aggregation_query(args);

        tracing::debug!(
            repos = ?REPOS,
            aggregations = ?aggregations,
            "running content publishing query"
        );

        let raw = self.executor.run_query(&REPOS, &aggregations).await?;
        Ok(generate_chart_config(&raw, args))
    }

    /// Like [`run`](Self::run), without rendering a chart
    pub async fn run_report(&self, args: &ReportArgs) -> Result<Report> {
        let aggregations = build_aggregation_query(args);
        let raw = self.executor.run_query(&REPOS, &aggregations).await?;
        Ok(generate_report(&raw, args))
    }
}

//! GET handlers serving the report as a resource

use crate::error::ReportError;
use crate::params::ReportArgs;
use crate::report::Report;
use crate::service::ContentPublishingReport;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub service: Arc<ContentPublishingReport>,
}

/// Query string for report requests
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// JSON-encoded [`ReportArgs`]
    #[serde(default)]
    pub params: Option<String>,
}

/// GET /content_publishing - run the report
pub async fn report_list_handler(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Report>, ReportError> {
    let args = parse_args(query.params.as_deref())?;
    let report = state.service.run(&args).await?;
    Ok(Json(report))
}

/// GET /content_publishing/:id - single-item view of the same report
pub async fn report_item_handler(
    state: State<ReportState>,
    Path(_id): Path<String>,
    query: Query<ReportQuery>,
) -> Result<Json<Report>, ReportError> {
    report_list_handler(state, query).await
}

fn parse_args(raw: Option<&str>) -> Result<ReportArgs, ReportError> {
    match raw {
        Some(raw) => {
            serde_json::from_str(raw).map_err(|e| ReportError::InvalidParams(e.to_string()))
        }
        None => Ok(ReportArgs::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_none_defaults() {
        let args = parse_args(None).unwrap();
        assert!(args.aggs.is_none());
    }

    #[test]
    fn test_parse_args_valid_json() {
        let args = parse_args(Some(r#"{"aggs": {"group": {"field": "source"}}}"#)).unwrap();
        assert_eq!(args.group_field(), Some("source"));
    }

    #[test]
    fn test_parse_args_invalid_json() {
        let err = parse_args(Some("{not json")).unwrap_err();
        assert!(matches!(err, ReportError::InvalidParams(_)));
    }
}

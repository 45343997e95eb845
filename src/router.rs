//! Report API router

use crate::endpoints::{report_item_handler, report_list_handler, ReportState};
use crate::service::{ContentPublishingReport, QueryExecutor};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Create the report router
///
/// The report is exposed GET-only, as a list and as a single item:
///
/// - `GET /content_publishing` - run the report
/// - `GET /content_publishing/:id` - single-item view
///
/// Arguments are passed as a JSON-encoded `params` query parameter.
pub fn report_router(executor: Arc<dyn QueryExecutor>) -> Router {
    let state = ReportState {
        service: Arc::new(ContentPublishingReport::new(executor)),
    };

    Router::new()
        .route("/content_publishing", get(report_list_handler))
        .route("/content_publishing/:id", get(report_item_handler))
        .with_state(state)
}

//! Error types for the report layer

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Report layer errors
///
/// Malformed scheme descriptors and missing optional fields are not
/// errors anywhere in this crate; they default or fall through. These
/// variants cover the request boundary and the index round trip only.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Invalid report parameters: {0}")]
    InvalidParams(String),

    #[error("Missing privilege: {0}")]
    Forbidden(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
    status: u16,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    reason: String,
}

impl ReportError {
    fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidParams(_) => "parse_exception",
            Self::Forbidden(_) => "security_exception",
            Self::Search(_) => "search_phase_execution_exception",
            Self::Internal(_) => "internal_server_error",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidParams(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Search(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = ErrorResponse {
            error: ErrorDetail {
                error_type: self.error_type().to_string(),
                reason: self.to_string(),
            },
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

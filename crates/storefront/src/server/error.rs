//! HTTP rendering of service errors.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::protocol::ErrorResponse;
use common::ServiceError;
use tracing::{debug, error};

/// An error on its way out as a JSON error envelope.
#[derive(Debug)]
pub enum ApiError {
    /// A failure reported by a service or by request validation.
    Service(ServiceError),
    /// A request axum refused before its content was looked at, such as an
    /// oversized body (413) or a missing `Content-Type` (415).
    Rejected { status: StatusCode, message: String },
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                ApiError::Service(ServiceError::invalid_field("body", rejection.body_text()))
            }
            other => ApiError::Rejected {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Service(ServiceError::api(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Service(ServiceError::api(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Service(err) => {
                let status = StatusCode::from_u16(err.http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    error!(error = %err, "request failed");
                } else {
                    debug!(status = status.as_u16(), error = %err, "request rejected");
                }
                (status, Json(ErrorResponse::from(&err))).into_response()
            }
            ApiError::Rejected { status, message } => {
                debug!(status = status.as_u16(), error = %message, "request refused");
                (status, Json(ErrorResponse::new(message))).into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

//! API error responses

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use formdesk_common::{ErrorBody, FormdeskError};
use thiserror::Error;

/// Error returned by a handler
#[derive(Debug, Error)]
pub enum ApiError {
    /// No record with this id
    #[error("User with id {0} not found.")]
    NotFound(String),

    /// Anything else the store reports
    #[error("{0}")]
    Internal(String),
}

impl From<FormdeskError> for ApiError {
    fn from(err: FormdeskError) -> Self {
        match err {
            FormdeskError::NotFound(id) => Self::NotFound(id),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

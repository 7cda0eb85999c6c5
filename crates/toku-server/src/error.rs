//! Error responses for the token service.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use toku_token::{ErrorKind, IssueError};

/// Errors returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Token issuance failed.
    #[error(transparent)]
    Issue(#[from] IssueError),

    /// The endpoint needs a signed-in principal.
    #[error("authentication required")]
    Unauthenticated,
}

impl ApiError {
    fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Issue(err) => err.kind(),
            ApiError::Unauthenticated => ErrorKind::Authentication,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::Issue(err) => err.user_message(),
            ApiError::Unauthenticated => IssueError::AuthenticationRequired.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = match kind {
            ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Signing => StatusCode::BAD_GATEWAY,
        };

        let body = json!({
            "status": "error",
            "kind": kind.as_str(),
            "message": self.message(),
        });
        (status, Json(body)).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// A failed handler call: the service error plus the operation it came from.
///
/// 404 and 500 carry no body; 400/401 carry the plain-text message the
/// client shows to the user. Internal details are logged, never returned.
#[derive(Debug)]
pub struct ApiError {
    op: &'static str,
    err: ServiceError,
}

impl ApiError {
    pub fn new(op: &'static str, err: ServiceError) -> Self {
        Self { op, err }
    }

    /// For `map_err`: tag a service error with the handler's operation name.
    pub fn during(op: &'static str) -> impl FnOnce(ServiceError) -> ApiError {
        move |err| ApiError { op, err }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.err {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
            ServiceError::DuplicateEmail => {
                (StatusCode::BAD_REQUEST, "Email already exists").into_response()
            }
            ServiceError::Unauthorized(failure) => {
                (StatusCode::UNAUTHORIZED, failure.to_string()).into_response()
            }
            ServiceError::Internal(msg) => {
                error!(op = self.op, error = %msg, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

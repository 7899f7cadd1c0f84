use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Error response: a status plus `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::BadRequest(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::Model(ModelError::Validation(msg)) => Self::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, msg),
            ServiceError::UpstreamUnavailable(msg) => Self::new(StatusCode::BAD_GATEWAY, msg),
            ServiceError::StorageUnavailable(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
            ServiceError::Model(ModelError::Db(msg)) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "request failed");
        } else if self.status == StatusCode::BAD_REQUEST {
            warn!(error = %self.message, "rejected input");
        }
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("store initialization failed: {0}")]
    Store(String),
}

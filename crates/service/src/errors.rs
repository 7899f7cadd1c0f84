use std::fmt::Display;

use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn car_not_found(model: &str) -> Self { Self::NotFound(format!("carro `{model}` not found")) }

    pub fn duplicate_model(model: &str) -> Self {
        Self::Conflict(format!("modelo `{model}` already exists; use updateCarro to change it"))
    }

    pub fn storage(e: impl Display) -> Self { Self::StorageUnavailable(e.to_string()) }

    pub fn upstream(e: impl Display) -> Self { Self::UpstreamUnavailable(e.to_string()) }

    /// Input problems, whether caught by the service or by a model validator.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_) | Self::Model(ModelError::Validation(_)))
    }
}

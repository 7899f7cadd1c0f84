use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Health {
    pub status: String,
    pub carros: usize,
}

impl Health {
    pub fn ok(carros: usize) -> Self {
        Self { status: "ok".into(), carros }
    }
}

/// Body of `GET /health` when the store cannot be reached.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthError {
    pub status: String,
    pub error: String,
}

impl HealthError {
    pub fn new(error: impl Into<String>) -> Self {
        Self { status: "error".into(), error: error.into() }
    }
}

/// Body of `GET /teste`, a human-oriented status probe.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub status: String,
    pub message: String,
    pub total_carros: usize,
    pub backend: String,
    /// Seconds since the Unix epoch, fractional.
    pub timestamp: f64,
}

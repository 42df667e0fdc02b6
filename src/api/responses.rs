//! API response structures

use axum::{http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{countdown::CountdownError, state::CountdownSnapshot};

/// Response for countdown control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub countdown: CountdownSnapshot,
}

impl ApiResponse {
    /// Create a successful response carrying the new countdown snapshot
    pub fn ok(message: impl Into<String>, countdown: CountdownSnapshot) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            countdown,
        }
    }
}

/// Body returned with every 4xx answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Error half of a handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Handler result for countdown control endpoints
pub type ApiResult = Result<Json<ApiResponse>, ApiError>;

impl From<CountdownError> for ErrorResponse {
    fn from(err: CountdownError) -> Self {
        Self::new(err.to_string())
    }
}

/// Map a countdown error onto its HTTP status
pub fn status_for(err: &CountdownError) -> StatusCode {
    match err {
        CountdownError::InvalidConfiguration { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        CountdownError::InvalidTransition { .. } | CountdownError::Exhausted => StatusCode::CONFLICT,
    }
}

/// Status response with countdown and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub countdown: CountdownSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

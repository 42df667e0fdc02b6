//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    countdown::{CountdownError, CountdownSettings},
    state::{AppState, CountdownSnapshot},
};
use super::responses::{status_for, ApiError, ApiResponse, ApiResult, HealthResponse, StatusResponse};

/// Body of POST /settings; fields may be numbers or numeric strings
#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    #[serde(default)]
    pub minutes: Value,
    #[serde(default)]
    pub seconds: Value,
}

fn reject(action: &str, err: CountdownError) -> ApiError {
    warn!("Rejected {} request: {}", action, err);
    (status_for(&err), Json(err.into()))
}

fn respond(
    action: &str,
    message: &str,
    result: Result<CountdownSnapshot, CountdownError>,
) -> ApiResult {
    match result {
        Ok(snapshot) => {
            info!("{} endpoint called - countdown {} at {}", action, snapshot.status, snapshot.display);
            Ok(Json(ApiResponse::ok(message, snapshot)))
        }
        Err(e) => Err(reject(action, e)),
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    respond("Start", "Countdown started", state.start())
}

/// Handle POST /pause - Pause the running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    respond("Pause", "Countdown paused", state.pause())
}

/// Handle POST /toggle - Start when stopped, pause when running
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    respond("Toggle", "Countdown toggled", state.toggle())
}

/// Handle POST /reset - Restore the configured duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    respond("Reset", "Countdown reset", state.reset())
}

/// Handle POST /settings - Validate and apply a new duration
pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SettingsRequest>,
) -> ApiResult {
    let settings = CountdownSettings::from_input(&request.minutes, &request.seconds)
        .map_err(|e| reject("Settings", e))?;

    respond("Settings", "Countdown configured", state.reconfigure(settings))
}

/// Handle GET /status - Return the countdown and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        countdown: state.snapshot(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

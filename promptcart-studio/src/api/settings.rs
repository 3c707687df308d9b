//! Optimizer settings endpoints
//!
//! The stored credential is never echoed back; responses only report
//! whether one is configured.

use crate::session::Session;
use crate::{ApiResult, AppState};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub has_credential: bool,
    pub endpoint: String,
    pub open: bool,
}

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub credential: String,
    pub endpoint: String,
}

fn settings_response(session: &Session) -> SettingsResponse {
    SettingsResponse {
        has_credential: session.preferences().has_credential(),
        endpoint: session.preferences().endpoint().to_string(),
        open: session.settings_open(),
    }
}

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    let session = state.session.lock().await;
    Json(settings_response(&session))
}

/// PUT /api/settings
///
/// Saves credential and endpoint, then closes the settings panel.
pub async fn put_settings(
    State(state): State<AppState>,
    Json(request): Json<SettingsRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    let mut session = state.session.lock().await;
    session
        .update_settings(&request.credential, &request.endpoint)
        .await?;
    Ok(Json(settings_response(&session)))
}

/// POST /api/settings/open
pub async fn open_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    let mut session = state.session.lock().await;
    session.open_settings();
    Json(settings_response(&session))
}

/// POST /api/settings/close
pub async fn close_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    let mut session = state.session.lock().await;
    session.close_settings();
    Json(settings_response(&session))
}

pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(get_settings).put(put_settings))
        .route("/api/settings/open", post(open_settings))
        .route("/api/settings/close", post(close_settings))
}

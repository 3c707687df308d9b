//! Confirmation dialog endpoints

use crate::api::StateResponse;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DialogResponse {
    /// False when no dialog was open
    pub closed: bool,
    pub state: StateResponse,
}

/// POST /api/dialog/confirm
pub async fn confirm_dialog(State(state): State<AppState>) -> Json<DialogResponse> {
    let mut session = state.session.lock().await;
    let closed = session.confirm_dialog();
    Json(DialogResponse {
        closed,
        state: StateResponse::build(&state, &session),
    })
}

/// POST /api/dialog/cancel
pub async fn cancel_dialog(State(state): State<AppState>) -> Json<DialogResponse> {
    let mut session = state.session.lock().await;
    let closed = session.cancel_dialog();
    Json(DialogResponse {
        closed,
        state: StateResponse::build(&state, &session),
    })
}

pub fn dialog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/dialog/confirm", post(confirm_dialog))
        .route("/api/dialog/cancel", post(cancel_dialog))
}

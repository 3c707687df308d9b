//! Translate and Optimize endpoints
//!
//! Both return 409 while the same operation is already in flight. The
//! remote call runs on its own task so a dropped request still applies the
//! result and releases the busy flag.

use crate::api::StateResponse;
use crate::enrichment::{OptimizeOutcome, TranslateOutcome};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EnrichmentResponse {
    /// `applied`, `skipped`, `failed` or `settings_required`
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub state: StateResponse,
}

async fn respond(
    state: &AppState,
    outcome: &'static str,
    message: Option<String>,
) -> Json<EnrichmentResponse> {
    let session = state.session.lock().await;
    Json(EnrichmentResponse {
        outcome,
        message,
        state: StateResponse::build(state, &session),
    })
}

/// POST /api/translate
pub async fn translate(State(state): State<AppState>) -> ApiResult<Json<EnrichmentResponse>> {
    let task_state = state.clone();
    let result = tokio::spawn(async move {
        task_state.orchestrator.translate(&task_state.session).await
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Translation task failed: {}", e)))?;

    let (outcome, message) = match result {
        TranslateOutcome::Busy => {
            return Err(ApiError::Conflict("Translation already in progress".to_string()))
        }
        TranslateOutcome::Skipped => ("skipped", None),
        TranslateOutcome::Applied(_) => ("applied", None),
        TranslateOutcome::Failed(message) => ("failed", Some(message)),
    };
    Ok(respond(&state, outcome, message).await)
}

/// POST /api/optimize
pub async fn optimize(State(state): State<AppState>) -> ApiResult<Json<EnrichmentResponse>> {
    let task_state = state.clone();
    let result = tokio::spawn(async move {
        task_state.orchestrator.optimize(&task_state.session).await
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Optimization task failed: {}", e)))?;

    let (outcome, message) = match result {
        OptimizeOutcome::Busy => {
            return Err(ApiError::Conflict("Optimization already in progress".to_string()))
        }
        OptimizeOutcome::SettingsRequired => ("settings_required", None),
        OptimizeOutcome::Skipped => ("skipped", None),
        OptimizeOutcome::Applied(_) => ("applied", None),
        OptimizeOutcome::Failed(message) => ("failed", Some(message)),
    };
    Ok(respond(&state, outcome, message).await)
}

pub fn enrichment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/translate", post(translate))
        .route("/api/optimize", post(optimize))
}

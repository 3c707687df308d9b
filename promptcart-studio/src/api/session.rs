//! Selection, prompt text, language and theme endpoints

use crate::error::{ApiError, ApiResult};
use crate::language::DisplayLanguage;
use crate::session::{Session, SessionSnapshot};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Session snapshot plus enrichment busy flags
#[derive(Debug, Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub session: SessionSnapshot,
    pub translating: bool,
    pub optimizing: bool,
}

impl StateResponse {
    pub fn build(state: &AppState, session: &Session) -> Self {
        Self {
            session: session.snapshot(),
            translating: state.orchestrator.is_translating(),
            optimizing: state.orchestrator.is_optimizing(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PromptTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: String,
}

/// GET /api/state
pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let session = state.session.lock().await;
    Json(StateResponse::build(&state, &session))
}

/// POST /api/tags/:id/toggle
pub async fn toggle_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<String>,
) -> ApiResult<Json<StateResponse>> {
    let tag = state
        .taxonomy
        .find_tag(&tag_id)
        .ok_or_else(|| ApiError::NotFound(format!("Tag not found: {}", tag_id)))?;

    let mut session = state.session.lock().await;
    session.toggle_tag(tag);
    Ok(Json(StateResponse::build(&state, &session)))
}

/// POST /api/clear
///
/// Opens the clear confirmation; nothing is cleared until it is confirmed.
pub async fn request_clear(State(state): State<AppState>) -> Json<StateResponse> {
    let mut session = state.session.lock().await;
    session.request_clear();
    Json(StateResponse::build(&state, &session))
}

/// GET /api/prompt
pub async fn get_prompt(State(state): State<AppState>) -> impl IntoResponse {
    let text = state.session.lock().await.prompt_text().into_owned();
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text)
}

/// PUT /api/prompt
pub async fn set_prompt(
    State(state): State<AppState>,
    Json(request): Json<PromptTextRequest>,
) -> Json<StateResponse> {
    let mut session = state.session.lock().await;
    session.set_prompt_text(request.text);
    Json(StateResponse::build(&state, &session))
}

/// PUT /api/language
pub async fn set_language(
    State(state): State<AppState>,
    Json(request): Json<LanguageRequest>,
) -> ApiResult<Json<StateResponse>> {
    let language = DisplayLanguage::from_code(&request.language).ok_or_else(|| {
        ApiError::BadRequest(format!("Unknown language: {}", request.language))
    })?;

    let mut session = state.session.lock().await;
    session.set_language(language).await?;
    Ok(Json(StateResponse::build(&state, &session)))
}

/// POST /api/language/toggle
pub async fn toggle_language(State(state): State<AppState>) -> ApiResult<Json<StateResponse>> {
    let mut session = state.session.lock().await;
    session.toggle_language().await?;
    Ok(Json(StateResponse::build(&state, &session)))
}

/// POST /api/theme/toggle
pub async fn toggle_theme(State(state): State<AppState>) -> ApiResult<Json<StateResponse>> {
    let mut session = state.session.lock().await;
    session.toggle_theme().await?;
    Ok(Json(StateResponse::build(&state, &session)))
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/tags/:tag_id/toggle", post(toggle_tag))
        .route("/api/clear", post(request_clear))
        .route("/api/prompt", get(get_prompt).put(set_prompt))
        .route("/api/language", put(set_language))
        .route("/api/language/toggle", post(toggle_language))
        .route("/api/theme/toggle", post(toggle_theme))
}

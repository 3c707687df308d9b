//! Taxonomy endpoints

use crate::error::{ApiError, ApiResult};
use crate::taxonomy::Category;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

/// GET /api/taxonomy
pub async fn get_taxonomy(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.taxonomy.categories().to_vec())
}

/// GET /api/taxonomy/:category_id
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> ApiResult<Json<Category>> {
    state
        .taxonomy
        .category(&category_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", category_id)))
}

pub fn taxonomy_routes() -> Router<AppState> {
    Router::new()
        .route("/api/taxonomy", get(get_taxonomy))
        .route("/api/taxonomy/:category_id", get(get_category))
}

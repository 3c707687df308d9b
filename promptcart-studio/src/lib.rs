//! promptcart-studio library
//!
//! Tag selection, prompt synthesis and remote enrichment behind an HTTP API.

use axum::Router;
use promptcart_common::events::EventBus;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod enrichment;
pub mod error;
pub mod gate;
pub mod i18n;
pub mod language;
pub mod preferences;
pub mod selection;
pub mod services;
pub mod session;
pub mod taxonomy;

pub use error::{ApiError, ApiResult};

use enrichment::EnrichmentOrchestrator;
use session::SharedSession;
use taxonomy::Taxonomy;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Selection, prompt text, dialog and preferences
    pub session: SharedSession,
    /// Translate / Optimize runner
    pub orchestrator: Arc<EnrichmentOrchestrator>,
    /// Read-only tag catalogue
    pub taxonomy: Arc<Taxonomy>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Server start time (for uptime)
    pub startup_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(
        session: SharedSession,
        orchestrator: Arc<EnrichmentOrchestrator>,
        taxonomy: Arc<Taxonomy>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            session,
            orchestrator,
            taxonomy,
            event_bus,
            startup_time: Instant::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::taxonomy_routes())
        .merge(api::session_routes())
        .merge(api::dialog_routes())
        .merge(api::settings_routes())
        .merge(api::enrichment_routes())
        .merge(api::sse_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Server-Sent Events for session changes

use crate::AppState;
use axum::{
    extract::State,
    response::sse::{Event, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use std::convert::Infallible;

/// GET /events - SSE stream of studio events
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    promptcart_common::sse::create_event_sse_stream("promptcart-studio", &state.event_bus)
}

pub fn sse_routes() -> Router<AppState> {
    Router::new().route("/events", get(event_stream))
}

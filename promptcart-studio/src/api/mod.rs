//! HTTP API handlers for promptcart-studio

pub mod dialog;
pub mod enrichment;
pub mod health;
pub mod session;
pub mod settings;
pub mod sse;
pub mod taxonomy;

pub use dialog::dialog_routes;
pub use enrichment::enrichment_routes;
pub use health::health_routes;
pub use session::{session_routes, StateResponse};
pub use settings::settings_routes;
pub use sse::sse_routes;
pub use taxonomy::taxonomy_routes;

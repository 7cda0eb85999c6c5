//! Router for the token service.

use crate::handlers;
use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnFailure, TraceLayer};
use tracing::Level;

/// Create the service router.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/token", post(handlers::issue_token))
        .route("/api/check-stream-config", get(handlers::check_stream_config))
        .route("/api/stream-test", get(handlers::stream_test))
        .route("/api/meetings/{id}/link", get(handlers::meeting_link))
        .route("/api/personal-room", get(handlers::personal_room))
        // Issuance failures are already logged by the issuer.
        .layer(TraceLayer::new_for_http().on_failure(DefaultOnFailure::new().level(Level::DEBUG)))
        .with_state(state)
}

//! HTTP token service for ToKu.
//!
//! Exposes the token issuer to the web client, plus configuration probes
//! and meeting link helpers. All state is resolved at startup; handlers
//! only read it.

pub mod error;
pub mod handlers;
pub mod identity;
pub mod routes;
pub mod state;

use state::SharedState;
use tokio::net::TcpListener;

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(state: SharedState) -> anyhow::Result<()> {
    let addr = state.config.server.bind_address();
    let app = routes::create_router(state.clone());

    let status = state.credential_status();
    if !status.config_complete {
        tracing::warn!(
            api_key_exists = status.api_key_exists,
            api_secret_exists = status.api_secret_exists,
            "Stream credentials incomplete; token requests will fail"
        );
    }

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "toku-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("toku-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

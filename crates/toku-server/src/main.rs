use std::sync::Arc;
use toku_core::TokuConfig;
use toku_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = TokuConfig::load(None)?;
    let state = AppState::init(config)?;

    toku_server::serve(Arc::new(state)).await
}

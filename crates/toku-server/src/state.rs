use std::sync::Arc;
use toku_core::{CredentialStatus, MeetingLinks, TokuConfig};
use toku_token::{IssuerConfig, TokenIssuer};

/// Shared application state, built once at startup and read-only after.
pub struct AppState {
    pub config: TokuConfig,
    pub issuer: TokenIssuer,
    pub links: MeetingLinks,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Resolve credentials and the links base URL from the environment.
    pub fn init(config: TokuConfig) -> anyhow::Result<Self> {
        let issuer = IssuerConfig::from_config(&config)?;
        let base_url = config.links.resolve_base_url();
        Ok(Self::new(config, issuer, base_url))
    }

    /// Build state from already-resolved values.
    pub fn new(config: TokuConfig, issuer: IssuerConfig, base_url: impl Into<String>) -> Self {
        Self {
            config,
            issuer: TokenIssuer::new(issuer),
            links: MeetingLinks::new(base_url),
        }
    }

    pub fn credential_status(&self) -> CredentialStatus {
        self.issuer.config().credentials.status()
    }

    pub fn identity_header(&self) -> &str {
        &self.config.server.identity_header
    }
}

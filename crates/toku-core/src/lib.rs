use serde::{Deserialize, Serialize};

// Configuration types shared across all ToKu crates
pub mod config;

// Shareable meeting URLs
pub mod links;

pub use config::{
    ApiCredentials, ConfigError, CredentialStatus, LinksConfig, ServerConfig, StreamConfig,
    TokenConfig, TokuConfig,
};
pub use links::MeetingLinks;

/// The signed-in end user a credential is issued for.
///
/// Resolved by the caller from whatever identity provider fronts the
/// service, then passed explicitly. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// A principal is only usable when its identifier is non-empty.
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

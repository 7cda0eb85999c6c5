//! Configuration types for the ToKu token service.
//!
//! Configuration is loaded once at process start from a YAML file
//! (`toku.yaml` by default) and handed to the components that need it.
//! Secrets are never stored in the file itself by default: the `stream`
//! section names the environment variables (or files) to read them from.
//!
//! # Sections
//!
//! - **stream**: where to find the Stream API key and signing secret
//! - **token**: issuance policy (validity window)
//! - **server**: HTTP bind address and identity header
//! - **links**: base URL for shareable meeting links

pub mod links;
pub mod server;
pub mod stream;
pub mod token;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use links::LinksConfig;
pub use server::ServerConfig;
pub use stream::{ApiCredentials, CredentialStatus, StreamConfig};
pub use token::TokenConfig;

/// Environment variable that overrides the configuration file path.
pub const CONFIG_PATH_ENV: &str = "TOKU_CONFIG";

/// Configuration file used when nothing else is specified.
pub const DEFAULT_CONFIG_FILE: &str = "toku.yaml";

/// Complete ToKu configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokuConfig {
    /// Stream credential sources.
    #[serde(default)]
    pub stream: StreamConfig,

    /// Token issuance policy.
    #[serde(default)]
    pub token: TokenConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Meeting link settings.
    #[serde(default)]
    pub links: LinksConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TokuConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path, or from the default
    /// location.
    ///
    /// An explicit path (argument or `TOKU_CONFIG`) must exist. The default
    /// `toku.yaml` is optional: when it is absent the defaults apply, so a
    /// deployment can run from environment variables alone.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(PathBuf::from(p));
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check semantic constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.validity.is_zero() {
            return Err(ConfigError::Config(
                "token.validity must be greater than zero".to_string(),
            ));
        }
        if self.server.identity_header.trim().is_empty() {
            return Err(ConfigError::Config(
                "server.identity_header must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

//! Stream credential configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where to find the Stream API key and signing secret.
///
/// Each value is resolved from its environment variable first, then its
/// file, then the inline value. A value that none of these provide resolves
/// to an empty string; rejecting it is the issuer's job, not the loader's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Environment variable containing the public API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,

    /// Public API key. Safe to expose to browsers.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable containing the signing secret.
    #[serde(default = "default_api_secret_env")]
    pub api_secret_env: Option<String>,

    /// Path to a file holding the signing secret.
    #[serde(default)]
    pub api_secret_file: Option<PathBuf>,

    /// Inline signing secret. Prefer `api_secret_env` or `api_secret_file`.
    #[serde(default)]
    pub api_secret: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            api_key: None,
            api_secret_env: default_api_secret_env(),
            api_secret_file: None,
            api_secret: None,
        }
    }
}

impl StreamConfig {
    /// Resolve both credentials from the process environment.
    pub fn resolve_credentials(&self) -> Result<ApiCredentials, std::io::Error> {
        self.resolve_credentials_with(|name| std::env::var(name).ok())
    }

    /// Resolve both credentials using `lookup` in place of the process
    /// environment.
    pub fn resolve_credentials_with<F>(&self, lookup: F) -> Result<ApiCredentials, std::io::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty variable counts as unset.
        let from_env = |name: Option<&str>| name.and_then(&lookup).filter(|v| !v.is_empty());

        let api_key = from_env(self.api_key_env.as_deref())
            .or_else(|| self.api_key.clone())
            .unwrap_or_default();

        let api_secret = match from_env(self.api_secret_env.as_deref()) {
            Some(secret) => secret,
            None => match &self.api_secret_file {
                Some(path) if path.exists() => std::fs::read_to_string(path)?.trim().to_string(),
                _ => self.api_secret.clone().unwrap_or_default(),
            },
        };

        Ok(ApiCredentials::new(api_key, api_secret))
    }
}

fn default_api_key_env() -> Option<String> {
    Some("NEXT_PUBLIC_STREAM_API_KEY".to_string())
}

fn default_api_secret_env() -> Option<String> {
    Some("STREAM_SECRET_KEY".to_string())
}

/// Resolved Stream API key and signing secret.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiCredentials {
    api_key: String,
    api_secret: String,
}

impl ApiCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    /// Report which values are present without exposing them.
    pub fn status(&self) -> CredentialStatus {
        let api_key_exists = !self.api_key.is_empty();
        let api_secret_exists = !self.api_secret.is_empty();
        CredentialStatus {
            api_key_exists,
            api_secret_exists,
            config_complete: api_key_exists && api_secret_exists,
        }
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.api_secret.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &secret)
            .finish()
    }
}

/// Presence report for the two credential values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    pub api_key_exists: bool,
    pub api_secret_exists: bool,
    pub config_complete: bool,
}

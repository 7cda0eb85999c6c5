//! Meeting link configuration.

use serde::{Deserialize, Serialize};

/// Where shareable meeting links point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Environment variable containing the public base URL.
    #[serde(default = "default_base_url_env")]
    pub base_url_env: Option<String>,

    /// Base URL used when the environment variable is unset.
    #[serde(default = "default_base_url")]
    pub base_url: Option<String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url_env: default_base_url_env(),
            base_url: default_base_url(),
        }
    }
}

impl LinksConfig {
    /// Resolve the base URL from the process environment.
    pub fn resolve_base_url(&self) -> String {
        self.resolve_base_url_with(|name| std::env::var(name).ok())
    }

    /// Resolve the base URL using `lookup` in place of the process
    /// environment. Empty values count as unset.
    pub fn resolve_base_url_with<F>(&self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        self.base_url_env
            .as_deref()
            .and_then(&lookup)
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.base_url.clone())
            .unwrap_or_default()
    }
}

fn default_base_url_env() -> Option<String> {
    Some("NEXT_PUBLIC_BASE_URL".to_string())
}

fn default_base_url() -> Option<String> {
    Some("http://localhost:3000".to_string())
}

//! HTTP server configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the token HTTP service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request header carrying the authenticated user id. The auth gateway
    /// in front of the service is expected to set it and strip any
    /// client-supplied copy.
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            identity_header: default_identity_header(),
        }
    }
}

impl ServerConfig {
    /// Bind address, e.g. "127.0.0.1:8080".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_identity_header() -> String {
    "x-auth-user-id".to_string()
}

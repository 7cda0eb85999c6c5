//! Token issuance policy.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

/// One hour, the default validity window.
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(60 * 60);

/// Policy for newly issued access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Time between a token's issued-at and expires-at claims
    /// (e.g., "1h", "24h").
    #[serde(
        default = "default_validity",
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub validity: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            validity: default_validity(),
        }
    }
}

fn default_validity() -> Duration {
    DEFAULT_VALIDITY
}

fn serialize_duration<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&humantime::format_duration(*value).to_string())
}

fn deserialize_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
}

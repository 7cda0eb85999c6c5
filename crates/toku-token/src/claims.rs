//! Token header, claims, and validity window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Seconds an issued-at claim is backdated by, so a verifier whose clock
/// runs slightly behind ours still accepts a fresh token.
pub const CLOCK_SKEW_SECS: i64 = 60;

/// JOSE header of a Stream access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
}

impl TokenHeader {
    pub const ALGORITHM: &'static str = "HS256";

    pub fn hs256() -> Self {
        Self {
            alg: Self::ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Claims carried by a Stream user token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The principal the token is bound to.
    pub user_id: String,

    /// Expiry, epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at, epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl TokenClaims {
    pub fn new(user_id: impl Into<String>, exp: Option<i64>, iat: Option<i64>) -> Self {
        Self {
            user_id: user_id.into(),
            exp,
            iat,
        }
    }

    /// Check if the token is expired at `now`. Tokens without `exp` never
    /// expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.is_some_and(|exp| now.timestamp() >= exp)
    }
}

/// Issued-at and expires-at pair for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenWindow {
    pub issued_at: i64,
    pub expires_at: i64,
}

impl TokenWindow {
    /// Window for a token generated at `now`: issued-at backdated by the
    /// clock skew allowance, expires-at one validity window later.
    pub fn starting_at(now: DateTime<Utc>, validity: Duration) -> Self {
        let issued_at = now.timestamp() - CLOCK_SKEW_SECS;
        let validity_secs = i64::try_from(validity.as_secs()).unwrap_or(i64::MAX);
        Self {
            issued_at,
            expires_at: issued_at.saturating_add(validity_secs),
        }
    }

    pub fn length_secs(&self) -> i64 {
        self.expires_at - self.issued_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_backdates_and_spans_validity() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let window = TokenWindow::starting_at(now, Duration::from_secs(3600));

        assert_eq!(window.issued_at, 1_700_000_000 - 60);
        assert_eq!(window.length_secs(), 3600);
    }

    #[test]
    fn test_claims_omit_missing_timestamps() {
        let claims = TokenClaims::new("test-user", Some(10), None);
        let json = serde_json::to_string(&claims).unwrap();
        assert_eq!(json, r#"{"user_id":"test-user","exp":10}"#);
    }

    #[test]
    fn test_expiry() {
        let now = DateTime::from_timestamp(1_000, 0).unwrap();
        assert!(TokenClaims::new("u", Some(1_000), None).is_expired_at(now));
        assert!(!TokenClaims::new("u", Some(1_001), None).is_expired_at(now));
        assert!(!TokenClaims::new("u", None, None).is_expired_at(now));
    }
}

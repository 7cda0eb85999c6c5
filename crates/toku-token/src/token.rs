//! Token verification and inspection.

use crate::claims::{TokenClaims, TokenHeader};
use crate::client::signing_key;
use crate::error::SignerError;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use ring::hmac;
use serde::de::DeserializeOwned;

/// Verifier for Stream user tokens.
pub struct TokenVerifier {
    key: hmac::Key,
}

impl TokenVerifier {
    /// Create a verifier keyed with the API secret.
    pub fn new(api_secret: &str) -> Result<Self, SignerError> {
        Ok(Self {
            key: signing_key(api_secret)?,
        })
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, SignerError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature, algorithm, and expiry as of `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, SignerError> {
        let parts = split_token(token)?;

        let header: TokenHeader = decode_segment(parts.header)?;
        if header.alg != TokenHeader::ALGORITHM {
            return Err(SignerError::VerificationFailed(format!(
                "unsupported algorithm {}",
                header.alg
            )));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(parts.signature)
            .map_err(|e| SignerError::TokenParseFailed(e.to_string()))?;
        hmac::verify(&self.key, parts.signing_input.as_bytes(), &signature)
            .map_err(|_| SignerError::VerificationFailed("signature mismatch".to_string()))?;

        let claims: TokenClaims = decode_segment(parts.claims)?;
        if claims.user_id.is_empty() {
            return Err(SignerError::MissingClaim {
                claim: "user_id".to_string(),
            });
        }
        if claims.is_expired_at(now) {
            return Err(SignerError::TokenExpired {
                expired_at: claims.exp.unwrap_or_default(),
            });
        }

        Ok(VerifiedToken {
            user_id: claims.user_id,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

/// A verified token with extracted claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// The principal the token is bound to.
    pub user_id: String,
    /// Issued-at, epoch seconds.
    pub issued_at: Option<i64>,
    /// Expiry, epoch seconds.
    pub expires_at: Option<i64>,
}

impl VerifiedToken {
    /// Length of the validity window, when both timestamps are present.
    pub fn validity_secs(&self) -> Option<i64> {
        Some(self.expires_at? - self.issued_at?)
    }
}

/// Inspect a token without verification (for debugging).
pub fn inspect_token_unverified(token: &str) -> Result<TokenInfo, SignerError> {
    let parts = split_token(token)?;
    Ok(TokenInfo {
        header: decode_segment(parts.header)?,
        claims: decode_segment(parts.claims)?,
    })
}

/// Information about a token (for inspection).
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub header: TokenHeader,
    pub claims: TokenClaims,
}

struct TokenParts<'a> {
    header: &'a str,
    claims: &'a str,
    signature: &'a str,
    signing_input: &'a str,
}

fn split_token(token: &str) -> Result<TokenParts<'_>, SignerError> {
    let token = token.trim();
    let (signing_input, signature) = token
        .rsplit_once('.')
        .ok_or_else(|| SignerError::TokenParseFailed("expected three segments".to_string()))?;
    let (header, claims) = signing_input
        .split_once('.')
        .ok_or_else(|| SignerError::TokenParseFailed("expected three segments".to_string()))?;
    if claims.contains('.') {
        return Err(SignerError::TokenParseFailed(
            "expected three segments".to_string(),
        ));
    }
    Ok(TokenParts {
        header,
        claims,
        signature,
        signing_input,
    })
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, SignerError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| SignerError::TokenParseFailed(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| SignerError::TokenParseFailed(e.to_string()))
}

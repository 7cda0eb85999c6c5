//! Error types for token signing and issuance.

use thiserror::Error;

/// Errors raised by a signing client or the verifier.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The signing secret cannot be used as an HMAC key.
    #[error("invalid signing secret: {0}")]
    InvalidSecret(String),

    /// Failed to serialize the token header or claims.
    #[error("token serialization error: {0}")]
    SerializationError(String),

    /// The signer produced an empty token.
    #[error("signer returned an empty token")]
    EmptyToken,

    /// Failed to parse a token.
    #[error("failed to parse token: {0}")]
    TokenParseFailed(String),

    /// Token signature or header did not check out.
    #[error("token verification failed: {0}")]
    VerificationFailed(String),

    /// Token has expired.
    #[error("token has expired at {expired_at}")]
    TokenExpired { expired_at: i64 },

    /// Token is missing a required claim.
    #[error("token missing required claim: {claim}")]
    MissingClaim { claim: String },
}

/// Kind of an issuance failure, used for routing and user messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Deployment is missing the API key or secret. Not retryable.
    Configuration,
    /// No signed-in principal. The user must sign in again.
    Authentication,
    /// Signing failed. May be transient.
    Signing,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Signing => "signing",
        }
    }
}

/// Errors returned by the token issuer.
#[derive(Debug, Error)]
pub enum IssueError {
    /// The API key or the signing secret is empty.
    #[error("Stream API credentials missing.")]
    CredentialsMissing {
        api_key_present: bool,
        api_secret_present: bool,
    },

    /// No principal, or a principal with an empty id.
    #[error("Authentication required. Please sign in again.")]
    AuthenticationRequired,

    /// The signing client failed or returned an empty token.
    #[error("Failed to generate Stream token: {0}")]
    Signing(#[source] SignerError),
}

impl IssueError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IssueError::CredentialsMissing { .. } => ErrorKind::Configuration,
            IssueError::AuthenticationRequired => ErrorKind::Authentication,
            IssueError::Signing(_) => ErrorKind::Signing,
        }
    }

    /// Concise message safe to show to end users. Never includes the
    /// underlying cause.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Configuration => {
                "Video service is not configured. Please contact the administrator."
            }
            ErrorKind::Authentication => "Authentication required. Please sign in again.",
            ErrorKind::Signing => "Failed to authenticate with Stream. Please try again.",
        }
    }
}

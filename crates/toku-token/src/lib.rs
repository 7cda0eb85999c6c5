//! # toku-token
//!
//! Stream access token handling for ToKu.
//!
//! This crate provides functionality for:
//! - Signing Stream user tokens (HS256 JWT) from an API key and secret
//! - Issuing short-lived tokens to signed-in principals
//! - Verifying and inspecting tokens
//!
//! ## Trust boundary
//!
//! The signing secret stays on the server. Browsers receive only the public
//! API key and the short-lived tokens minted by [`TokenIssuer`], each bound
//! to one user id and valid for the configured window.

pub mod claims;
pub mod client;
pub mod error;
pub mod issuer;
pub mod token;

pub use claims::{CLOCK_SKEW_SECS, TokenClaims, TokenHeader, TokenWindow};
pub use client::{SigningClient, SigningClientFactory, StreamClient, StreamClientFactory};
pub use error::{ErrorKind, IssueError, SignerError};
pub use issuer::{IssuerConfig, PROBE_USER_ID, TokenIssuer};
pub use token::{TokenInfo, TokenVerifier, VerifiedToken, inspect_token_unverified};

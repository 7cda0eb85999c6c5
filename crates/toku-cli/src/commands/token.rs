//! Token commands.
//!
//! `toku token mint` - Mint a token for a user.
//! `toku token verify` - Verify a token against the configured secret.
//! `toku token inspect` - Decode a token without verification.

use anyhow::Context;
use chrono::DateTime;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use toku_core::{Principal, TokuConfig};
use toku_token::{IssuerConfig, TokenIssuer, TokenVerifier, inspect_token_unverified};

/// Read a token from a file if `token` names one, else use it as-is.
fn resolve_token(token: &str) -> anyhow::Result<String> {
    let path = Path::new(token);
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read token from file: {}", path.display()))?;
        return Ok(content.trim().to_string());
    }
    Ok(token.trim().to_string())
}

fn parse_validity(validity: Option<&str>, config: &TokuConfig) -> anyhow::Result<Duration> {
    let Some(raw) = validity else {
        return Ok(config.token.validity);
    };
    let duration = humantime::parse_duration(raw.trim())
        .with_context(|| format!("Invalid validity window: {raw}"))?;
    anyhow::ensure!(!duration.is_zero(), "Validity window must be greater than zero");
    Ok(duration)
}

fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}

pub(crate) fn mint_token(config: IssuerConfig, user: &str) -> anyhow::Result<String> {
    let issuer = TokenIssuer::new(config);
    let token = issuer.issue(Some(&Principal::new(user)))?;
    Ok(token)
}

/// Mint a token for `user` with the configured (or overridden) window.
pub fn mint(
    config: &TokuConfig,
    user: &str,
    validity: Option<&str>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let validity = parse_validity(validity, config)?;
    let mut issuer_config =
        IssuerConfig::from_config(config).context("Failed to read Stream credentials")?;
    issuer_config.validity = validity;
    let token = mint_token(issuer_config, user)?;

    if let Some(output_path) = output {
        fs::write(&output_path, &token)?;
        println!("✔ Token written to: {}", output_path.display());
        println!("  User: {}", user);
        println!("  Valid for: {}", humantime::format_duration(validity));
    } else {
        println!("{}", token);
    }

    Ok(())
}

/// Verify a token with the configured secret.
pub fn verify(config: &TokuConfig, token: &str) -> anyhow::Result<()> {
    let token = resolve_token(token)?;
    let credentials = config
        .stream
        .resolve_credentials()
        .context("Failed to read Stream credentials")?;
    let verifier = TokenVerifier::new(credentials.api_secret())
        .context("Stream secret not configured. Set STREAM_SECRET_KEY")?;

    let verified = verifier.verify(&token)?;

    println!("✔ Token is valid");
    println!("  User: {}", verified.user_id);
    if let Some(iat) = verified.issued_at {
        println!("  Issued at: {}", format_timestamp(iat));
    }
    match verified.expires_at {
        Some(exp) => println!("  Expires at: {}", format_timestamp(exp)),
        None => println!("  Expires at: never"),
    }

    Ok(())
}

/// Inspect a token without verification.
pub fn inspect(token: &str) -> anyhow::Result<()> {
    let token = resolve_token(token)?;
    let info = inspect_token_unverified(&token)?;

    println!("Token Information (signature NOT verified):");
    println!("  Algorithm: {}", info.header.alg);
    println!();
    println!("{}", serde_json::to_string_pretty(&info.claims)?);

    Ok(())
}

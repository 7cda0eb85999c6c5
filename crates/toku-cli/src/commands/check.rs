//! `toku check` - Report credential and link configuration.

use anyhow::Context;
use toku_core::{CredentialStatus, TokuConfig};

fn mark(present: bool) -> &'static str {
    if present { "✔" } else { "✘" }
}

fn report(status: &CredentialStatus, base_url: &str) -> Vec<String> {
    vec![
        format!("{} API key", mark(status.api_key_exists)),
        format!("{} API secret", mark(status.api_secret_exists)),
        format!("  Meeting links: {}", if base_url.is_empty() { "(unset)" } else { base_url }),
    ]
}

pub fn run(config: &TokuConfig) -> anyhow::Result<()> {
    let credentials = config
        .stream
        .resolve_credentials()
        .context("Failed to read Stream credentials")?;
    let status = credentials.status();

    for line in report(&status, &config.links.resolve_base_url()) {
        println!("{}", line);
    }

    anyhow::ensure!(status.config_complete, "Stream configuration incomplete");
    println!("✔ Stream configuration is complete");
    Ok(())
}

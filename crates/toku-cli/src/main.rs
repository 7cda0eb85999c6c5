use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toku_core::TokuConfig;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "toku", version, about = "ToKu token service CLI")]
struct Cli {
    /// Path to toku.yaml. Defaults to ./toku.yaml when present.
    #[arg(long, global = true, env = "TOKU_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mint, verify, and inspect Stream access tokens
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },

    /// Report whether the Stream credentials are configured
    Check,

    /// Print the shareable link for a meeting
    Link {
        /// Meeting id (for a personal room, the owner's user id)
        meeting_id: String,

        /// Link to the personal room rather than a regular meeting
        #[arg(long, default_value_t = false)]
        personal: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Mint a token for a user, exactly as the service would
    Mint {
        /// User id the token is bound to
        #[arg(long)]
        user: String,

        /// Override the configured validity window (e.g. "1h", "24h")
        #[arg(long)]
        validity: Option<String>,

        /// Write the token to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Verify a token's signature and expiry with the configured secret
    Verify {
        /// Token string, or a path to a file containing one
        token: String,
    },

    /// Decode a token without verifying it
    Inspect {
        /// Token string, or a path to a file containing one
        token: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TokuConfig::load(cli.config.as_deref())?;

    match cli.cmd {
        Command::Token { cmd } => match cmd {
            TokenCommand::Mint {
                user,
                validity,
                output,
            } => commands::token::mint(&config, &user, validity.as_deref(), output)?,
            TokenCommand::Verify { token } => commands::token::verify(&config, &token)?,
            TokenCommand::Inspect { token } => commands::token::inspect(&token)?,
        },
        Command::Check => commands::check::run(&config)?,
        Command::Link {
            meeting_id,
            personal,
        } => commands::link::run(&config, &meeting_id, personal),
    }

    Ok(())
}

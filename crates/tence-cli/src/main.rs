use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tence-cli")]
#[command(about = "Tence CLI - one-shot access to the chat session", long_about = None)]
struct Cli {
    /// Use the offline echo backend instead of the completion server
    #[arg(long, global = true)]
    echo: bool,

    /// Path to a config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message and print the reply
    Ask {
        message: String,
        /// Authorization code sent with the message
        #[arg(long, default_value = "")]
        code: String,
        /// Memory depth (clamped to 1..=10)
        #[arg(long, allow_negative_numbers = true)]
        depth: Option<i64>,
    },
    /// Show plan and remaining free turns
    Status,
    /// Print the conversation so far
    History {
        /// Print the raw JSON transcript
        #[arg(long)]
        json: bool,
    },
    /// Apply an authorization code without chatting
    Unlock { code: String },
    /// Print the resolved configuration (secrets redacted)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tence=warn")),
        )
        .init();

    let ctx = commands::Context::load(cli.config, cli.echo)?;

    match cli.command {
        Commands::Ask {
            message,
            code,
            depth,
        } => commands::session::ask(&ctx, message, code, depth).await?,
        Commands::Status => commands::session::status(&ctx).await?,
        Commands::History { json } => commands::session::history(&ctx, json).await?,
        Commands::Unlock { code } => commands::session::unlock(&ctx, &code).await?,
        Commands::Config => commands::config::show(&ctx)?,
    }

    Ok(())
}

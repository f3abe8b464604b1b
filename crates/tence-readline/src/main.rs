mod command;
mod helper;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing_subscriber::EnvFilter;

use tence_application::{ChatRequest, ChatSession, TurnOutcome, open_session};
use tence_core::session::{MemoryDepth, QUOTA_NOTICE, TranscriptEntry};
use tence_infrastructure::ConfigService;
use tence_infrastructure::paths::TencePaths;
use tence_interaction::BackendKind;

use crate::command::Command;
use crate::helper::ReplHelper;

#[derive(Parser)]
#[command(name = "tence")]
#[command(about = "Tence interactive chat", long_about = None)]
struct Args {
    /// Memory depth (clamped to 1..=10); defaults to the configured value
    #[arg(long, allow_negative_numbers = true)]
    depth: Option<i64>,

    /// Use the offline echo backend instead of the completion server
    #[arg(long)]
    echo: bool,

    /// Path to a config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Mutable REPL settings that ride along with every message.
struct ReplState {
    code: String,
    depth: MemoryDepth,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to a file so the prompt stays readable.
    let log_dir = TencePaths::logs_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "tence.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tence=info")),
        )
        .init();

    let config = match &args.config {
        Some(path) => ConfigService::with_config_path(path),
        None => ConfigService::new(),
    }
    .load()?;

    let backend = if args.echo {
        BackendKind::Echo
    } else {
        BackendKind::CompletionApi
    };
    let session = open_session(&config, backend).await?;

    let mut state = ReplState {
        code: String::new(),
        depth: MemoryDepth::clamped(args.depth.unwrap_or(config.default_depth as i64)),
    };

    tracing::info!(depth = state.depth.get(), echo = args.echo, "REPL started");

    let mut rl: Editor<ReplHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ReplHelper));

    println!("{}", "=== Tence ===".bright_magenta().bold());
    println!("{}", "Type '/help' for commands, or 'quit' to exit.".bright_black());
    print_status(&session).await;
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match Command::parse(trimmed) {
                    Command::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Command::Code(code) => {
                        if code.is_empty() {
                            println!("{}", "Code cleared.".bright_black());
                        } else {
                            println!("{}", "Code set; it will be sent with your next message.".bright_black());
                        }
                        state.code = code;
                    }
                    Command::Depth(depth) => {
                        state.depth = depth;
                        println!("{}", format!("Memory depth: {}", depth.get()).bright_black());
                    }
                    Command::Status => print_status(&session).await,
                    Command::History => print_history(&session.transcript().await),
                    Command::Help => print_help(),
                    Command::Invalid(reason) => println!("{}", reason.yellow()),
                    Command::Message(message) => {
                        send_message(&session, &state, message).await;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

async fn send_message(session: &ChatSession, state: &ReplState, message: String) {
    let request = ChatRequest::new(message, state.code.clone(), state.depth.get());

    match session.send(&request).await {
        Ok(TurnOutcome::Replied { response, .. }) => {
            for line in response.lines() {
                println!("{}", line.bright_blue());
            }
        }
        Ok(TurnOutcome::Denied) => println!("{}", QUOTA_NOTICE.bright_yellow()),
        // The session stays usable after a failed turn.
        Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
    }
}

async fn print_status(session: &ChatSession) {
    let status = session.status().await;
    let line = match status.remaining_free_turns {
        None => format!(
            "Premium · {} turns used · {} tokens per reply",
            status.use_count, status.token_budget
        ),
        Some(remaining) => format!(
            "Free tier · {}/{} turns used · {} remaining · {} tokens per reply",
            status.use_count, status.max_free_turns, remaining, status.token_budget
        ),
    };
    println!("{}", line.bright_black());
}

fn print_history(transcript: &[TranscriptEntry]) {
    if transcript.is_empty() {
        println!("{}", "No history yet.".bright_black());
        return;
    }
    for entry in transcript {
        match entry {
            TranscriptEntry::UserTurn(user, assistant) => {
                println!("{}", format!("> {}", user).green());
                for line in assistant.lines() {
                    println!("{}", line.bright_blue());
                }
            }
            TranscriptEntry::SystemNotice { system } => {
                println!("{}", format!("[System] {}", system).bright_yellow());
            }
        }
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_magenta());
    println!("  {}  set the authorization code sent with messages", "/code <secret>".bright_cyan());
    println!(
        "  {}       set memory depth ({}..={})",
        "/depth <n>".bright_cyan(),
        MemoryDepth::MIN,
        MemoryDepth::MAX
    );
    println!("  {}         show quota and plan", "/status".bright_cyan());
    println!("  {}        show the conversation so far", "/history".bright_cyan());
    println!("  {}      leave", "quit | exit".bright_cyan());
}

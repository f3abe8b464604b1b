use anyhow::Result;
use tence_application::{ChatRequest, TurnOutcome};
use tence_core::session::{MemoryDepth, QUOTA_NOTICE, TranscriptEntry};

use super::Context;

pub async fn ask(ctx: &Context, message: String, code: String, depth: Option<i64>) -> Result<()> {
    let depth = MemoryDepth::clamped(depth.unwrap_or(ctx.config.default_depth as i64));
    let session = ctx.open().await?;

    match session
        .send(&ChatRequest::new(message, code, depth.get()))
        .await?
    {
        TurnOutcome::Replied { response, .. } => println!("{}", response),
        TurnOutcome::Denied => {
            // Denial is not an error, but scripts should be able to tell.
            eprintln!("{}", QUOTA_NOTICE);
            std::process::exit(2);
        }
    }
    Ok(())
}

pub async fn status(ctx: &Context) -> Result<()> {
    let status = ctx.open().await?.status().await;

    println!("Plan:         {}", if status.premium { "premium" } else { "free" });
    println!("Turns used:   {}", status.use_count);
    match status.remaining_free_turns {
        Some(remaining) => println!(
            "Free turns:   {} of {} remaining",
            remaining, status.max_free_turns
        ),
        None => println!("Free turns:   unlimited"),
    }
    println!("Token budget: {}", status.token_budget);
    println!("Transcript:   {} entries", status.transcript_len);
    Ok(())
}

pub async fn history(ctx: &Context, json: bool) -> Result<()> {
    let transcript = ctx.open().await?.transcript().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&transcript)?);
        return Ok(());
    }
    for entry in &transcript {
        match entry {
            TranscriptEntry::UserTurn(user, assistant) => {
                println!("User: {}", user);
                println!("Assistant: {}", assistant);
            }
            TranscriptEntry::SystemNotice { system } => println!("[System] {}", system),
        }
    }
    Ok(())
}

pub async fn unlock(ctx: &Context, code: &str) -> Result<()> {
    if ctx.open().await?.unlock(code).await? {
        println!("Premium unlocked.");
        Ok(())
    } else {
        anyhow::bail!("Invalid authorization code")
    }
}

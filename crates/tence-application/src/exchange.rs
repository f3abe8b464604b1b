//! Request and response types at the session boundary.

use serde::Serialize;
use tence_core::session::Transcript;

/// One user interaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatRequest {
    pub message: String,
    /// Unlock code field; empty when the user entered nothing.
    pub code: String,
    /// Trailing turns used as context. Front-ends clamp this to
    /// `MemoryDepth::MIN..=MemoryDepth::MAX`; zero means the whole transcript.
    pub depth: usize,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, code: impl Into<String>, depth: usize) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            depth,
        }
    }
}

/// What happened to a single turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The generator answered and the turn was appended.
    Replied { response: String, token_budget: u32 },
    /// Free quota exhausted; the quota notice was appended instead.
    Denied,
}

impl TurnOutcome {
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }
}

/// Four-field reply for UI bindings that echo their input widgets.
///
/// Carries the updated transcript twice (display + state), an empty string
/// that clears the message box, and the code exactly as it was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatExchange {
    pub history: Transcript,
    pub cleared_input: String,
    pub code: String,
    pub state: Transcript,
}

impl ChatExchange {
    pub fn new(history: Transcript, code: String) -> Self {
        Self {
            state: history.clone(),
            history,
            cleared_input: String::new(),
            code,
        }
    }
}

/// Snapshot of the entitlement for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub premium: bool,
    pub use_count: u64,
    pub max_free_turns: u64,
    /// `None` once premium.
    pub remaining_free_turns: Option<u64>,
    /// Budget the next allowed turn would get.
    pub token_budget: u32,
    pub transcript_len: usize,
}

//! Parsing of REPL input lines.

use tence_core::session::MemoryDepth;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Sets the code sent with subsequent messages. Empty clears it.
    Code(String),
    Depth(MemoryDepth),
    Status,
    History,
    Help,
    /// Anything else, sent as a chat message.
    Message(String),
    /// A slash command that could not be parsed.
    Invalid(String),
}

impl Command {
    /// Parses one trimmed, non-empty line.
    pub fn parse(line: &str) -> Self {
        if line == "quit" || line == "exit" {
            return Self::Quit;
        }
        if !line.starts_with('/') {
            return Self::Message(line.to_string());
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        match name {
            "/code" => Self::Code(arg.to_string()),
            "/depth" => match arg.parse::<i64>() {
                Ok(n) => Self::Depth(MemoryDepth::clamped(n)),
                Err(_) => Self::Invalid(format!(
                    "Usage: /depth <n>  ({}..={})",
                    MemoryDepth::MIN,
                    MemoryDepth::MAX
                )),
            },
            "/status" => Self::Status,
            "/history" => Self::History,
            "/help" => Self::Help,
            other => Self::Invalid(format!("Unknown command: {other}")),
        }
    }
}

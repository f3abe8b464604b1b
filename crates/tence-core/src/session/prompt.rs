//! Prompt assembly and response extraction.

use super::message::TranscriptEntry;

pub const USER_LABEL: &str = "User:";
pub const ASSISTANT_LABEL: &str = "Assistant:";

/// Renders the windowed history plus the new message as a completion prompt.
///
/// Each turn becomes `User: {u}\nAssistant: {a}\n`; the prompt ends with
/// `User: {message}\nAssistant:` and no trailing newline. Notices are not
/// conversation and are left out. Turn text is passed through verbatim.
pub fn assemble(window: &[TranscriptEntry], message: &str) -> String {
    let mut prompt = String::new();
    for entry in window {
        if let TranscriptEntry::UserTurn(user, assistant) = entry {
            prompt.push_str(&format!("{USER_LABEL} {user}\n{ASSISTANT_LABEL} {assistant}\n"));
        }
    }
    prompt.push_str(&format!("{USER_LABEL} {message}\n{ASSISTANT_LABEL}"));
    prompt
}

/// Pulls the assistant reply out of raw generator output.
///
/// Keeps what follows the last `Assistant:` label, trimmed. Output without the
/// label is returned unchanged.
pub fn extract_response(raw: &str) -> String {
    match raw.rfind(ASSISTANT_LABEL) {
        Some(index) => raw[index + ASSISTANT_LABEL.len()..].trim().to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_single_turn() {
        let window = [TranscriptEntry::turn("hi", "hello")];
        assert_eq!(
            assemble(&window, "how are you"),
            "User: hi\nAssistant: hello\nUser: how are you\nAssistant:"
        );
    }

    #[test]
    fn test_assemble_empty_window() {
        assert_eq!(assemble(&[], "ping"), "User: ping\nAssistant:");
    }

    #[test]
    fn test_assemble_skips_notices() {
        let window = [
            TranscriptEntry::turn("a", "b"),
            TranscriptEntry::quota_notice(),
            TranscriptEntry::turn("c", "d"),
        ];
        assert_eq!(
            assemble(&window, "e"),
            "User: a\nAssistant: b\nUser: c\nAssistant: d\nUser: e\nAssistant:"
        );
    }

    #[test]
    fn test_assemble_keeps_multiline_text() {
        let window = [TranscriptEntry::turn("line1\nline2", "ok")];
        assert!(assemble(&window, "x").starts_with("User: line1\nline2\nAssistant: ok\n"));
    }

    #[test]
    fn test_extract_after_last_label() {
        let raw = "User: hi\nAssistant: hello\nUser: how are you\nAssistant: I am fine";
        assert_eq!(extract_response(raw), "I am fine");
    }

    #[test]
    fn test_extract_without_label_is_verbatim() {
        assert_eq!(extract_response("  just text \n"), "  just text \n");
    }

    #[test]
    fn test_extract_trailing_label_is_empty() {
        assert_eq!(extract_response("User: x\nAssistant:"), "");
    }
}

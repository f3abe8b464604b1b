//! Transcript entry types.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Notice surfaced when the free quota is exhausted. Front-ends rely on the
/// exact wording.
pub const QUOTA_NOTICE: &str = "Please enter the authorization code to continue.";

/// Author label older transcripts used for in-band notices.
pub const LEGACY_SYSTEM_AUTHOR: &str = "System";

/// One element of a [`Transcript`].
///
/// On disk a conversational turn is the pair `["user", "assistant"]` and a
/// notice is `{"system": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TranscriptEntry {
    /// A user message and the assistant's reply.
    UserTurn(String, String),
    /// A non-conversational notice produced by the session itself.
    SystemNotice { system: String },
}

impl TranscriptEntry {
    pub fn turn(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self::UserTurn(user.into(), assistant.into())
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self::SystemNotice {
            system: text.into(),
        }
    }

    /// The fixed quota-exceeded notice.
    pub fn quota_notice() -> Self {
        Self::notice(QUOTA_NOTICE)
    }

    pub fn is_notice(&self) -> bool {
        matches!(self, Self::SystemNotice { .. })
    }

    /// Maps a pre-variant `["System", QUOTA_NOTICE]` pair to a notice.
    ///
    /// Only the exact quota notice is converted so that a user who literally
    /// typed "System" keeps their turn.
    pub fn upgrade_legacy(self) -> Self {
        match self {
            Self::UserTurn(user, assistant)
                if user == LEGACY_SYSTEM_AUTHOR && assistant == QUOTA_NOTICE =>
            {
                Self::notice(assistant)
            }
            other => other,
        }
    }
}

// Derived untagged deserialization would also accept `["text"]` as a notice
// (structs deserialize from sequences), so notices are read as maps only.
impl<'de> Deserialize<'de> for TranscriptEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Pair(String, String),
            Notice(BTreeMap<String, String>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Pair(user, assistant) => Ok(Self::UserTurn(user, assistant)),
            Repr::Notice(mut fields) => match fields.remove("system") {
                Some(system) if fields.is_empty() => Ok(Self::SystemNotice { system }),
                _ => Err(D::Error::custom(
                    "expected a [user, assistant] pair or a {\"system\": text} notice",
                )),
            },
        }
    }
}

/// Chronological, append-only conversation history.
pub type Transcript = Vec<TranscriptEntry>;

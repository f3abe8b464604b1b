//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: Transcript entries (`TranscriptEntry`, `Transcript`)
//! - `window`: Trailing-turn selection (`window`, `MemoryDepth`)
//! - `prompt`: Prompt rendering and reply extraction
//! - `repository`: Repository trait for transcript persistence

mod message;
mod prompt;
mod repository;
mod window;

pub use message::{LEGACY_SYSTEM_AUTHOR, QUOTA_NOTICE, Transcript, TranscriptEntry};
pub use prompt::{ASSISTANT_LABEL, USER_LABEL, assemble, extract_response};
pub use repository::TranscriptRepository;
pub use window::{MemoryDepth, window};

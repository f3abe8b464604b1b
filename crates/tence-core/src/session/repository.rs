//! Transcript repository trait.

use super::message::{Transcript, TranscriptEntry};
use crate::error::Result;
use async_trait::async_trait;

/// Durable storage for the session transcript.
///
/// Implementations overwrite the whole transcript on every save; there is no
/// append log.
#[async_trait]
pub trait TranscriptRepository: Send + Sync {
    /// Loads the stored transcript, or an empty one when nothing is stored.
    ///
    /// A malformed store is an error, never an empty transcript.
    async fn load(&self) -> Result<Transcript>;

    /// Replaces the stored transcript.
    async fn save(&self, transcript: &[TranscriptEntry]) -> Result<()>;
}

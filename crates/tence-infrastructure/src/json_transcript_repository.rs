//! JSON file-backed transcript repository.

use crate::storage::AtomicJsonFile;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tence_core::Result;
use tence_core::session::{Transcript, TranscriptEntry, TranscriptRepository};

/// Stores the transcript as a JSON array of `[user, assistant]` pairs and
/// `{"system": ...}` notices.
pub struct JsonTranscriptRepository {
    file: AtomicJsonFile<Transcript>,
}

impl JsonTranscriptRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicJsonFile::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[async_trait]
impl TranscriptRepository for JsonTranscriptRepository {
    async fn load(&self) -> Result<Transcript> {
        let transcript: Transcript = self
            .file
            .load()?
            .unwrap_or_default()
            .into_iter()
            .map(TranscriptEntry::upgrade_legacy)
            .collect();

        tracing::debug!(
            path = %self.path().display(),
            entries = transcript.len(),
            "Loaded transcript"
        );
        Ok(transcript)
    }

    async fn save(&self, transcript: &[TranscriptEntry]) -> Result<()> {
        self.file.save(&transcript.to_vec())?;
        Ok(())
    }
}

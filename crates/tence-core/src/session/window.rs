//! History window: the trailing turns used as generation context.

use super::message::TranscriptEntry;

/// Memory depth chosen by the front-end, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MemoryDepth(usize);

impl MemoryDepth {
    pub const MIN: usize = 1;
    pub const MAX: usize = 10;

    /// Clamps any user-supplied value into range.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as usize)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for MemoryDepth {
    fn default() -> Self {
        Self(crate::config::DEFAULT_MEMORY_DEPTH)
    }
}

impl From<MemoryDepth> for usize {
    fn from(depth: MemoryDepth) -> Self {
        depth.0
    }
}

/// Returns the last `min(depth, len)` entries in original order.
///
/// A depth of zero means "no limit" and yields the whole transcript. Range
/// checks are the caller's job (see [`MemoryDepth`]).
pub fn window(transcript: &[TranscriptEntry], depth: usize) -> &[TranscriptEntry] {
    if depth == 0 {
        return transcript;
    }
    let start = transcript.len().saturating_sub(depth);
    &transcript[start..]
}

//! Atomic JSON file operations.
//!
//! Every save writes a hidden sibling temp file, fsyncs it and renames it over
//! the target, so a crash leaves either the old or the new content on disk.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tence_core::TenceError;
use thiserror::Error;

/// Errors that can occur during atomic JSON operations.
#[derive(Debug, Error)]
pub enum AtomicJsonError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file exists but does not hold valid JSON for the target type.
    #[error("JSON parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
    /// File locking error.
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<AtomicJsonError> for TenceError {
    fn from(err: AtomicJsonError) -> Self {
        match err {
            AtomicJsonError::Io(e) => e.into(),
            AtomicJsonError::Parse { path, source } => TenceError::corrupt(&path, source.to_string()),
            AtomicJsonError::Serialize(e) => e.into(),
            AtomicJsonError::Lock(message) => TenceError::Lock(message),
        }
    }
}

/// A handle to a JSON file that is replaced atomically on save.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Consistency**: Malformed content is reported, never silently replaced
/// - **Isolation**: An exclusive lock file guards each write
/// - **Durability**: Explicit fsync before rename
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist
    /// - `Err`: Failed to read, or the content is not valid for `T`. An empty
    ///   file is invalid too: it is what a torn write leaves behind.
    pub fn load(&self) -> Result<Option<T>, AtomicJsonError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| AtomicJsonError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Saves data to the file atomically.
    pub fn save(&self, data: &T) -> Result<(), AtomicJsonError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(data).map_err(AtomicJsonError::Serialize)?;

        let _lock = FileLock::acquire(&self.path)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), bytes = json.len(), "Saved JSON file");
        Ok(())
    }

    /// Hidden sibling used for the write-then-rename.
    fn temp_path(&self) -> Result<PathBuf, AtomicJsonError> {
        let file_name = self.path.file_name().ok_or_else(|| {
            AtomicJsonError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// A file lock guard that releases the lock when dropped.
///
/// The lock file itself stays on disk. Unlinking it would let a later writer
/// lock a fresh inode while an earlier one still holds the old.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicJsonError> {
        let lock_path = path.with_extension("lock");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AtomicJsonError::Lock(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("counter.json"));

        let counter = Counter {
            name: "turns".to_string(),
            count: 3,
        };
        file.save(&counter).unwrap();

        assert_eq!(file.load().unwrap(), Some(counter));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("missing.json"));

        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_blank_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();

        for content in ["", "  \n"] {
            let path = temp_dir.path().join("blank.json");
            fs::write(&path, content).unwrap();

            let file = AtomicJsonFile::<Counter>::new(path);
            let err = file.load().unwrap_err();
            assert!(matches!(err, AtomicJsonError::Parse { .. }));
        }
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{\"name\": ").unwrap();

        let file = AtomicJsonFile::<Counter>::new(path.clone());
        let err = file.load().unwrap_err();
        assert!(matches!(err, AtomicJsonError::Parse { .. }));

        // Left untouched for the operator.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"name\": ");

        let mapped: TenceError = err.into();
        assert!(mapped.is_corrupt_state());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("counter.json");
        let file = AtomicJsonFile::<Counter>::new(path.clone());

        file.save(&Counter {
            name: "a".to_string(),
            count: 1,
        })
        .unwrap();

        assert!(path.exists());
        assert!(!path.with_file_name(".counter.json.tmp").exists());
    }

    #[test]
    fn test_lock_file_is_kept_between_saves() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        let lock_path = path.with_extension("lock");
        let file = AtomicJsonFile::<Counter>::new(path);

        let counter = Counter {
            name: "a".to_string(),
            count: 1,
        };
        file.save(&counter).unwrap();
        assert!(lock_path.exists());

        file.save(&counter).unwrap();
        assert!(lock_path.exists());
        assert_eq!(file.load().unwrap(), Some(counter));
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("counter.json"));

        for count in 0..3 {
            file.save(&Counter {
                name: "n".to_string(),
                count,
            })
            .unwrap();
        }

        assert_eq!(file.load().unwrap().unwrap().count, 2);
    }
}

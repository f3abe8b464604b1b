//! JSON file-backed entitlement repository.

use crate::storage::AtomicJsonFile;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tence_core::Result;
use tence_core::entitlement::{EntitlementRecord, EntitlementRepository};

/// Stores the entitlement record as `{"premium": bool, "use_count": int}`.
pub struct JsonEntitlementRepository {
    file: AtomicJsonFile<EntitlementRecord>,
}

impl JsonEntitlementRepository {
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
impl EntitlementRepository for JsonEntitlementRepository {
    async fn load(&self) -> Result<EntitlementRecord> {
        let record = self.file.load()?;
        if record.is_none() {
            tracing::debug!(path = %self.path().display(), "No entitlement record, using defaults");
        }
        Ok(record.unwrap_or_default())
    }

    async fn save(&self, record: &EntitlementRecord) -> Result<()> {
        self.file.save(record)?;
        Ok(())
    }
}

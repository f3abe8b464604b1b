//! Entitlement repository trait.

use super::model::EntitlementRecord;
use crate::error::Result;
use async_trait::async_trait;

/// Durable storage for the single process-wide [`EntitlementRecord`].
#[async_trait]
pub trait EntitlementRepository: Send + Sync {
    /// Loads the record.
    ///
    /// # Returns
    ///
    /// - `Ok(record)`: stored record, or the default when nothing is stored yet
    /// - `Err(_)`: storage unreadable or the stored record is malformed
    async fn load(&self) -> Result<EntitlementRecord>;

    /// Replaces the stored record. Either the new record is stored or the
    /// previous one is left intact.
    async fn save(&self, record: &EntitlementRecord) -> Result<()>;
}

//! EntitlementRecord domain model.

use serde::{Deserialize, Serialize};

/// Premium flag plus the cumulative usage counter.
///
/// Serialized as `{"premium": bool, "use_count": int}`. Missing fields fall
/// back to their defaults so older or hand-edited files still load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementRecord {
    /// Whether the unlock code has been accepted.
    #[serde(default)]
    pub premium: bool,
    /// Turns consumed so far. Keeps counting after unlock for audit.
    #[serde(default)]
    pub use_count: u64,
}

impl EntitlementRecord {
    /// Free turns left before the unlock code is required.
    ///
    /// Always `None` once premium.
    pub fn remaining_free_turns(&self, max_free_turns: u64) -> Option<u64> {
        if self.premium {
            None
        } else {
            Some(max_free_turns.saturating_sub(self.use_count))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_free_and_unused() {
        let record = EntitlementRecord::default();
        assert!(!record.premium);
        assert_eq!(record.use_count, 0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let record: EntitlementRecord = serde_json::from_str(r#"{"premium": true}"#).unwrap();
        assert!(record.premium);
        assert_eq!(record.use_count, 0);
    }

    #[test]
    fn test_remaining_free_turns() {
        let record = EntitlementRecord {
            premium: false,
            use_count: 7,
        };
        assert_eq!(record.remaining_free_turns(5), Some(0));

        let premium = EntitlementRecord {
            premium: true,
            use_count: 7,
        };
        assert_eq!(premium.remaining_free_turns(5), None);
    }
}

//! Per-turn entitlement decisions.

use std::fmt;

use super::model::EntitlementRecord;
use crate::config::AppConfig;

/// Quota and budget policy applied by [`EntitlementGate`].
#[derive(Clone, PartialEq, Eq)]
pub struct EntitlementPolicy {
    pub unlock_code: String,
    pub max_free_turns: u64,
    pub free_tokens: u32,
    pub premium_tokens: u32,
}

impl Default for EntitlementPolicy {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for EntitlementPolicy {
    fn from(config: &AppConfig) -> Self {
        Self {
            unlock_code: config.unlock_code.clone(),
            max_free_turns: config.max_free_turns,
            free_tokens: config.free_tokens,
            premium_tokens: config.premium_tokens,
        }
    }
}

// The unlock code never shows up in logs.
impl fmt::Debug for EntitlementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitlementPolicy")
            .field("unlock_code", &"<redacted>")
            .field("max_free_turns", &self.max_free_turns)
            .field("free_tokens", &self.free_tokens)
            .field("premium_tokens", &self.premium_tokens)
            .finish()
    }
}

/// Outcome of the quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The turn may run with at most `token_budget` new tokens.
    Allowed { token_budget: u32 },
    /// Free quota exhausted and no valid unlock code.
    Denied,
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    pub fn token_budget(&self) -> Option<u32> {
        match self {
            Self::Allowed { token_budget } => Some(*token_budget),
            Self::Denied => None,
        }
    }
}

/// Result of [`EntitlementGate::authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorization {
    /// The submitted code matched the unlock secret (even if already premium).
    pub code_accepted: bool,
    pub decision: GateDecision,
}

impl Authorization {
    /// Whether the record was touched and has to be written back.
    ///
    /// Re-entering the correct code counts: each acceptance is persisted.
    pub fn requires_persist(&self) -> bool {
        self.code_accepted || self.decision.is_allowed()
    }
}

/// Decides whether a turn is permitted and which generation budget applies.
#[derive(Debug, Clone, Default)]
pub struct EntitlementGate {
    policy: EntitlementPolicy,
}

impl EntitlementGate {
    pub fn new(policy: EntitlementPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &EntitlementPolicy {
        &self.policy
    }

    /// Applies the unlock code to `record`.
    ///
    /// Surrounding whitespace is ignored. Returns `true` when the code matched;
    /// matching again while already premium is a no-op that still returns `true`.
    pub fn apply_code(&self, record: &mut EntitlementRecord, code: &str) -> bool {
        let candidate = code.trim();
        if candidate.is_empty() || candidate != self.policy.unlock_code {
            return false;
        }
        if !record.premium {
            tracing::info!("Unlock code accepted, premium enabled");
        }
        record.premium = true;
        true
    }

    /// Quota check without side effects.
    pub fn check_quota(&self, record: &EntitlementRecord) -> GateDecision {
        if !record.premium && record.use_count >= self.policy.max_free_turns {
            return GateDecision::Denied;
        }
        GateDecision::Allowed {
            token_budget: self.token_budget(record),
        }
    }

    /// Budget that applies to `record` right now.
    pub fn token_budget(&self, record: &EntitlementRecord) -> u32 {
        if record.premium {
            self.policy.premium_tokens
        } else {
            self.policy.free_tokens
        }
    }

    /// Runs the full gate for one turn: code, quota, then usage accounting.
    ///
    /// On an allowed outcome `use_count` is incremented, premium or not.
    /// The caller persists `record` when [`Authorization::requires_persist`].
    pub fn authorize(&self, record: &mut EntitlementRecord, code: &str) -> Authorization {
        let code_accepted = self.apply_code(record, code);
        let decision = self.check_quota(record);

        match decision {
            GateDecision::Allowed { token_budget } => {
                record.use_count = record.use_count.saturating_add(1);
                tracing::debug!(
                    use_count = record.use_count,
                    premium = record.premium,
                    token_budget,
                    "Turn authorized"
                );
            }
            GateDecision::Denied => {
                tracing::info!(use_count = record.use_count, "Free quota exhausted");
            }
        }

        Authorization {
            code_accepted,
            decision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free(use_count: u64) -> EntitlementRecord {
        EntitlementRecord {
            premium: false,
            use_count,
        }
    }

    #[test]
    fn test_fresh_record_gets_free_budget() {
        let gate = EntitlementGate::default();
        let mut record = EntitlementRecord::default();

        let auth = gate.authorize(&mut record, "");

        assert!(!auth.code_accepted);
        assert_eq!(auth.decision, GateDecision::Allowed { token_budget: 50 });
        assert_eq!(record.use_count, 1);
    }

    #[test]
    fn test_quota_boundary() {
        let gate = EntitlementGate::default();
        let mut record = free(4);

        let last = gate.authorize(&mut record, "");
        assert!(last.decision.is_allowed());
        assert_eq!(record.use_count, 5);

        let denied = gate.authorize(&mut record, "");
        assert_eq!(denied.decision, GateDecision::Denied);
        assert!(!denied.requires_persist());
        assert_eq!(record.use_count, 5);
    }

    #[test]
    fn test_unlock_in_the_denied_call_is_allowed() {
        let gate = EntitlementGate::default();
        let mut record = free(5);

        let auth = gate.authorize(&mut record, "  TENCEPRO2025\n");

        assert!(auth.code_accepted);
        assert_eq!(auth.decision, GateDecision::Allowed { token_budget: 200 });
        assert!(record.premium);
        assert_eq!(record.use_count, 6);
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let gate = EntitlementGate::default();
        let mut record = free(0);

        assert!(gate.apply_code(&mut record, "TENCEPRO2025"));
        assert!(gate.apply_code(&mut record, "TENCEPRO2025"));
        assert!(record.premium);
    }

    #[test]
    fn test_wrong_code_changes_nothing() {
        let gate = EntitlementGate::default();
        let mut record = free(5);

        let auth = gate.authorize(&mut record, "tencepro2025");

        assert!(!auth.code_accepted);
        assert!(!record.premium);
        assert_eq!(auth.decision, GateDecision::Denied);
    }

    #[test]
    fn test_whitespace_only_code_is_ignored() {
        let gate = EntitlementGate::new(EntitlementPolicy {
            unlock_code: String::new(),
            ..EntitlementPolicy::default()
        });
        let mut record = free(0);

        assert!(!gate.apply_code(&mut record, "   "));
        assert!(!record.premium);
    }

    #[test]
    fn test_premium_keeps_counting() {
        let gate = EntitlementGate::default();
        let mut record = EntitlementRecord {
            premium: true,
            use_count: 40,
        };

        let auth = gate.authorize(&mut record, "");

        assert_eq!(auth.decision.token_budget(), Some(200));
        assert_eq!(record.use_count, 41);
    }

    #[test]
    fn test_custom_policy() {
        let gate = EntitlementGate::new(EntitlementPolicy {
            unlock_code: "open".to_string(),
            max_free_turns: 1,
            free_tokens: 10,
            premium_tokens: 20,
        });
        let mut record = free(0);

        assert_eq!(
            gate.authorize(&mut record, "").decision,
            GateDecision::Allowed { token_budget: 10 }
        );
        assert_eq!(gate.authorize(&mut record, "").decision, GateDecision::Denied);
        assert_eq!(
            gate.authorize(&mut record, "open").decision,
            GateDecision::Allowed { token_budget: 20 }
        );
    }

    #[test]
    fn test_debug_redacts_code() {
        let rendered = format!("{:?}", EntitlementPolicy::default());
        assert!(!rendered.contains("TENCEPRO2025"));
    }
}

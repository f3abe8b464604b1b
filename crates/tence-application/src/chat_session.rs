//! The session controller.
//!
//! One `ChatSession` owns the entitlement record and the transcript for the
//! lifetime of the process. Each interaction runs
//! `CHECK_CODE -> CHECK_QUOTA -> {DENIED | GENERATE} -> APPEND -> PERSIST`
//! while holding the session lock, so concurrent callers are serialized.

use std::sync::Arc;

use tence_core::Generator;
use tence_core::Result;
use tence_core::entitlement::{
    EntitlementGate, EntitlementPolicy, EntitlementRecord, EntitlementRepository, GateDecision,
};
use tence_core::session::{
    Transcript, TranscriptEntry, TranscriptRepository, assemble, extract_response, window,
};
use tokio::sync::Mutex;

use crate::exchange::{ChatExchange, ChatRequest, SessionStatus, TurnOutcome};

/// Mutable state guarded by the session lock.
struct SessionState {
    entitlement: EntitlementRecord,
    transcript: Transcript,
}

/// Turn-based chat session with quota enforcement and durable state.
pub struct ChatSession {
    gate: EntitlementGate,
    entitlement_repository: Arc<dyn EntitlementRepository>,
    transcript_repository: Arc<dyn TranscriptRepository>,
    generator: Arc<dyn Generator>,
    state: Mutex<SessionState>,
}

impl ChatSession {
    /// Opens the session, loading both records once.
    ///
    /// Missing records start fresh; malformed ones abort with
    /// `TenceError::CorruptState`.
    pub async fn open(
        policy: EntitlementPolicy,
        entitlement_repository: Arc<dyn EntitlementRepository>,
        transcript_repository: Arc<dyn TranscriptRepository>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self> {
        let entitlement = entitlement_repository.load().await?;
        let transcript = transcript_repository.load().await?;

        tracing::info!(
            premium = entitlement.premium,
            use_count = entitlement.use_count,
            turns = transcript.len(),
            backend = generator.name(),
            "Session opened"
        );

        Ok(Self {
            gate: EntitlementGate::new(policy),
            entitlement_repository,
            transcript_repository,
            generator,
            state: Mutex::new(SessionState {
                entitlement,
                transcript,
            }),
        })
    }

    /// Runs one interaction and reports what happened.
    ///
    /// Quota is charged before generation: if the generator fails, the
    /// incremented `use_count` stays persisted and the transcript is unchanged.
    pub async fn send(&self, request: &ChatRequest) -> Result<TurnOutcome> {
        let mut state = self.state.lock().await;

        // CHECK_CODE + CHECK_QUOTA
        let mut entitlement = state.entitlement;
        let authorization = self.gate.authorize(&mut entitlement, &request.code);
        if authorization.requires_persist() {
            self.entitlement_repository.save(&entitlement).await?;
            state.entitlement = entitlement;
        }

        let token_budget = match authorization.decision {
            GateDecision::Allowed { token_budget } => token_budget,
            GateDecision::Denied => {
                // Kept in memory only; written out with the next successful turn.
                state.transcript.push(TranscriptEntry::quota_notice());
                return Ok(TurnOutcome::Denied);
            }
        };

        // GENERATE
        let prompt = assemble(window(&state.transcript, request.depth), &request.message);
        tracing::debug!(
            depth = request.depth,
            token_budget,
            prompt_chars = prompt.len(),
            "Generating reply"
        );
        let raw = self.generator.generate(&prompt, token_budget).await.map_err(|e| {
            tracing::error!(error = %e, "Generation failed, turn not recorded");
            e
        })?;
        let response = extract_response(&raw);

        // APPEND + PERSIST
        state
            .transcript
            .push(TranscriptEntry::turn(request.message.clone(), response.clone()));
        if let Err(e) = self.transcript_repository.save(&state.transcript).await {
            state.transcript.pop();
            return Err(e);
        }
        self.entitlement_repository.save(&state.entitlement).await?;

        tracing::info!(
            use_count = state.entitlement.use_count,
            premium = state.entitlement.premium,
            turns = state.transcript.len(),
            "Turn recorded"
        );

        Ok(TurnOutcome::Replied {
            response,
            token_budget,
        })
    }

    /// Simplified boundary: runs the turn and returns the updated transcript.
    pub async fn chat(&self, message: &str, code: &str, depth: usize) -> Result<Transcript> {
        self.send(&ChatRequest::new(message, code, depth)).await?;
        Ok(self.transcript().await)
    }

    /// UI-binding boundary: transcript, cleared input, echoed code, transcript.
    pub async fn chat_exchange(&self, request: ChatRequest) -> Result<ChatExchange> {
        self.send(&request).await?;
        Ok(ChatExchange::new(self.transcript().await, request.code))
    }

    /// Applies an unlock code without running a turn.
    ///
    /// Returns whether the code matched. A match is persisted every time,
    /// including when the session is already premium.
    pub async fn unlock(&self, code: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        let mut entitlement = state.entitlement;
        if !self.gate.apply_code(&mut entitlement, code) {
            return Ok(false);
        }
        self.entitlement_repository.save(&entitlement).await?;
        state.entitlement = entitlement;
        Ok(true)
    }

    pub async fn transcript(&self) -> Transcript {
        self.state.lock().await.transcript.clone()
    }

    pub async fn entitlement(&self) -> EntitlementRecord {
        self.state.lock().await.entitlement
    }

    pub async fn status(&self) -> SessionStatus {
        let state = self.state.lock().await;
        let policy = self.gate.policy();
        SessionStatus {
            premium: state.entitlement.premium,
            use_count: state.entitlement.use_count,
            max_free_turns: policy.max_free_turns,
            remaining_free_turns: state
                .entitlement
                .remaining_free_turns(policy.max_free_turns),
            token_budget: self.gate.token_budget(&state.entitlement),
            transcript_len: state.transcript.len(),
        }
    }
}

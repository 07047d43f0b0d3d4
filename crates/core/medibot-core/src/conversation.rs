//! Per-request conversation pipeline
//!
//! Runs detect name -> detect profile -> persist profile -> fetch history ->
//! assemble prompt -> chat -> persist both turns. A missing name rejects the
//! request before anything is written; any later failure is returned as-is
//! and no turn of the pair is stored.
//!
//! The sequence is not one transaction. Concurrent requests for the same
//! name can interleave their history and race on the profile upsert (last
//! write wins).

use crate::config::MediBotConfig;
use crate::detectors::{
    KeywordProfileDetector, NameDetector, PatternNameDetector, ProfileDetector,
};
use crate::logging::preview;
use crate::templates::build_prompt;
use crate::types::*;
use crate::{MediBotError, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

/// Prompt ready to hand to the chat service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedTurn {
    /// Detected, capitalized user name
    pub user: String,
    /// Detected profile (already persisted)
    pub profile: Profile,
    /// The transcribed text this turn answers
    pub user_text: String,
    /// System instruction, history, then the new user message
    pub messages: Vec<ChatMessage>,
}

/// Outcome of a fully handled request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationReply {
    /// Detected, capitalized user name
    pub user: String,
    /// Detected profile
    pub profile: Profile,
    /// Assistant reply returned by the chat service
    pub reply: String,
}

/// Wires detectors, stores and the chat collaborator together
pub struct ConversationService {
    config: MediBotConfig,
    profiles: Arc<dyn ProfileStore>,
    history: Arc<dyn HistoryStore>,
    chat: Arc<dyn ChatCompleter>,
    name_detector: Box<dyn NameDetector>,
    profile_detector: Box<dyn ProfileDetector>,
}

impl ConversationService {
    /// Create a service using the default Spanish detectors
    ///
    /// Fails with a `Config` error when `config` does not validate.
    pub fn new(
        config: MediBotConfig,
        profiles: Arc<dyn ProfileStore>,
        history: Arc<dyn HistoryStore>,
        chat: Arc<dyn ChatCompleter>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            profiles,
            history,
            chat,
            name_detector: Box::new(PatternNameDetector::default()),
            profile_detector: Box::new(KeywordProfileDetector::default()),
        })
    }

    /// Swap the name detection strategy
    pub fn with_name_detector(mut self, detector: impl NameDetector + 'static) -> Self {
        self.name_detector = Box::new(detector);
        self
    }

    /// Swap the profile detection strategy
    pub fn with_profile_detector(mut self, detector: impl ProfileDetector + 'static) -> Self {
        self.profile_detector = Box::new(detector);
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &MediBotConfig {
        &self.config
    }

    /// Run every step up to prompt assembly, persisting the profile
    pub async fn prepare(&self, text: &str) -> Result<PreparedTurn> {
        let user = match self.name_detector.detect_name(text) {
            Some(name) => name,
            None => {
                info!(text = %preview(text), "Rejected turn: no name detected");
                return Err(MediBotError::name_not_detected(text));
            }
        };

        let profile = self.profile_detector.detect_profile(text);
        debug!(user = %user, profile = %profile, "Detected user profile");

        self.profiles.upsert_profile(&user, profile).await?;

        let history = self
            .history
            .get_recent_turns(&user, self.config.history_limit)
            .await?;
        debug!(user = %user, turns = history.len(), "Fetched history");

        let messages = build_prompt(profile, &history, text);

        Ok(PreparedTurn {
            user,
            profile,
            user_text: text.to_string(),
            messages,
        })
    }

    /// Handle one transcribed utterance end to end
    pub async fn handle_text(&self, text: &str) -> Result<ConversationReply> {
        let span = tracing::info_span!("conversation_turn", text_len = text.len());
        self.handle_text_inner(text).instrument(span).await
    }

    async fn handle_text_inner(&self, text: &str) -> Result<ConversationReply> {
        let prepared = self.prepare(text).await?;

        let reply = match self
            .chat
            .complete(&self.config.chat_model, &prepared.messages)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(user = %prepared.user, error = %e, "Chat service failed");
                return Err(e);
            }
        };

        self.history
            .append_exchange(&prepared.user, &prepared.user_text, &reply)
            .await
            .inspect_err(|e| warn!(user = %prepared.user, error = %e, "Failed to store exchange"))?;

        info!(
            user = %prepared.user,
            profile = %prepared.profile,
            reply = %preview(&reply),
            "Conversation turn completed"
        );

        Ok(ConversationReply {
            user: prepared.user,
            profile: prepared.profile,
            reply,
        })
    }
}

//! Chat-completion collaborator types

use super::{HistoryMessage, Role};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role tag understood by the chat-completion service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Tone/behaviour instruction
    System,
    /// User message
    User,
    /// Assistant message
    Assistant,
}

impl From<Role> for ChatRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => ChatRole::User,
            Role::Assistant => ChatRole::Assistant,
        }
    }
}

/// One role-tagged message of a chat prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role tag
    pub role: ChatRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&HistoryMessage> for ChatMessage {
    fn from(msg: &HistoryMessage) -> Self {
        Self {
            role: msg.role.into(),
            content: msg.content.clone(),
        }
    }
}

/// External chat-completion service
///
/// Implementations wrap a concrete AI provider; failures should be reported
/// as [`crate::MediBotError::Upstream`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Return the assistant reply for an ordered prompt
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String>;
}

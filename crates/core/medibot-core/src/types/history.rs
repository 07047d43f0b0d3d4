//! Conversation history types

use crate::MediBotError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Speaker of a stored turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person talking to MediBot
    User,
    /// MediBot's reply
    Assistant,
}

impl Role {
    /// Stored label
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = MediBotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(MediBotError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

/// One immutable message of a stored conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Insertion-ordered identifier assigned by the store
    pub id: i64,
    /// Owner of the conversation
    pub user: String,
    /// Speaker
    pub role: Role,
    /// Message text
    pub content: String,
    /// Milliseconds since the Unix epoch, non-decreasing per insertion
    pub timestamp: i64,
}

/// The `{role, content}` projection of a turn used to rebuild a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    /// Speaker
    pub role: Role,
    /// Message text
    pub content: String,
}

impl HistoryMessage {
    /// Create a history message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<Turn> for HistoryMessage {
    fn from(turn: Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content,
        }
    }
}

//! Repository interfaces for profiles and history
//!
//! Each call is atomic on its own. Nothing here makes the
//! detect/upsert/read/append sequence of one request transactional:
//! two concurrent requests for the same name may interleave their turns,
//! and the later profile upsert wins.

use super::{HistoryMessage, Profile, Role, Turn};
use crate::Result;
use async_trait::async_trait;

/// Persistent `name -> profile` mapping with upsert semantics
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert or replace the profile stored for `name`
    async fn upsert_profile(&self, name: &str, profile: Profile) -> Result<()>;

    /// Stored profile, or [`Profile::General`] for unknown names
    async fn get_profile(&self, name: &str) -> Result<Profile>;

    /// Whether a profile row exists for `name`
    async fn name_exists(&self, name: &str) -> Result<bool>;
}

/// Append-only log of conversation turns
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append one turn stamped with the current time
    async fn append_turn(&self, name: &str, role: Role, content: &str) -> Result<Turn>;

    /// Append a user turn and the assistant reply atomically
    async fn append_exchange(
        &self,
        name: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<()>;

    /// Up to `limit` most recent turns for `name`, oldest first
    async fn get_recent_turns(&self, name: &str, limit: usize) -> Result<Vec<HistoryMessage>>;

    /// Number of turns stored for `name`
    async fn count_turns(&self, name: &str) -> Result<usize>;
}

//! In-memory collaborators for tests

use crate::types::*;
use crate::{MediBotError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// [`ProfileStore`] backed by a `HashMap`
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<String, Profile>>,
}

impl InMemoryProfileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored profile, sorted by name
    pub fn snapshot(&self) -> Vec<UserProfile> {
        let mut all: Vec<UserProfile> = lock(&self.profiles)
            .iter()
            .map(|(name, profile)| UserProfile::new(name.clone(), *profile))
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn upsert_profile(&self, name: &str, profile: Profile) -> Result<()> {
        lock(&self.profiles).insert(name.to_string(), profile);
        Ok(())
    }

    async fn get_profile(&self, name: &str) -> Result<Profile> {
        Ok(lock(&self.profiles).get(name).copied().unwrap_or_default())
    }

    async fn name_exists(&self, name: &str) -> Result<bool> {
        Ok(lock(&self.profiles).contains_key(name))
    }
}

/// [`HistoryStore`] backed by a `Vec`
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    turns: Mutex<Vec<Turn>>,
}

impl InMemoryHistoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored turn in insertion order
    pub fn all_turns(&self) -> Vec<Turn> {
        lock(&self.turns).clone()
    }

    fn push(turns: &mut Vec<Turn>, name: &str, role: Role, content: &str) -> Turn {
        let now = chrono::Utc::now().timestamp_millis();
        let last = turns.last().map(|t| t.timestamp).unwrap_or(0);
        let turn = Turn {
            id: turns.len() as i64 + 1,
            user: name.to_string(),
            role,
            content: content.to_string(),
            timestamp: now.max(last),
        };
        turns.push(turn.clone());
        turn
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append_turn(&self, name: &str, role: Role, content: &str) -> Result<Turn> {
        if name.is_empty() {
            return Err(MediBotError::validation("turn user must not be empty"));
        }
        Ok(Self::push(&mut lock(&self.turns), name, role, content))
    }

    async fn append_exchange(
        &self,
        name: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(MediBotError::validation("turn user must not be empty"));
        }
        let mut turns = lock(&self.turns);
        Self::push(&mut turns, name, Role::User, user_text);
        Self::push(&mut turns, name, Role::Assistant, assistant_text);
        Ok(())
    }

    async fn get_recent_turns(&self, name: &str, limit: usize) -> Result<Vec<HistoryMessage>> {
        let turns = lock(&self.turns);
        let mut recent: Vec<HistoryMessage> = turns
            .iter()
            .rev()
            .filter(|t| t.user == name)
            .take(limit)
            .map(|t| HistoryMessage::new(t.role, t.content.clone()))
            .collect();
        recent.reverse();
        Ok(recent)
    }

    async fn count_turns(&self, name: &str) -> Result<usize> {
        Ok(lock(&self.turns).iter().filter(|t| t.user == name).count())
    }
}

/// [`ChatCompleter`] that answers from a fixed script and records prompts
#[derive(Debug, Default)]
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedChat {
    /// Answer with `replies` in order, then fail with an upstream error
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: Mutex::default(),
        }
    }

    /// Fail every call with an upstream error
    pub fn failing() -> Self {
        Self::default()
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<Vec<ChatMessage>> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl ChatCompleter for ScriptedChat {
    async fn complete(&self, _model: &str, messages: &[ChatMessage]) -> Result<String> {
        lock(&self.prompts).push(messages.to_vec());
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Err(MediBotError::upstream("scripted chat has no reply left")))
    }
}

//! Per-sender conversation state.
//!
//! Process-lifetime caches only: bounded turn history for model context, and
//! the owner-takeover pause map. Both are mutex-guarded so concurrent sender
//! pipelines can share them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tracing::debug;

pub const DEFAULT_MAX_TURNS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Bounded per-sender history. Sessions are created lazily on first append
/// and never explicitly destroyed.
pub struct SessionStore {
    max_turns: usize,
    sessions: Mutex<HashMap<String, VecDeque<ConversationTurn>>>,
}

impl SessionStore {
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns: max_turns.max(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Append a turn, truncating to the most recent `max_turns`.
    pub fn append(&self, sender_id: &str, turn: ConversationTurn) {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let session = sessions.entry(sender_id.to_string()).or_default();
        session.push_back(turn);
        while session.len() > self.max_turns {
            session.pop_front();
        }
    }

    /// Snapshot of the sender's history, oldest first.
    pub fn history(&self, sender_id: &str) -> Vec<ConversationTurn> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(sender_id)
            .map(|session| session.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn turn_count(&self, sender_id: &str) -> usize {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.get(sender_id).map_or(0, VecDeque::len)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

/// Owner-takeover gate: while a chat is paused, automated replies are
/// suppressed entirely. Entries expire once the wall clock passes the resume
/// timestamp and are then treated as absent.
#[derive(Default)]
pub struct PauseMap {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl PauseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause a chat for `minutes` from now (operator sent a message into it).
    pub fn pause(&self, chat_id: &str, minutes: i64) {
        let resume_at = Utc::now() + Duration::minutes(minutes);
        debug!(chat_id, %resume_at, "chat paused for owner takeover");
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(chat_id.to_string(), resume_at);
    }

    pub fn is_paused(&self, chat_id: &str) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(chat_id) {
            Some(resume_at) if *resume_at > Utc::now() => true,
            Some(_) => {
                entries.remove(chat_id);
                false
            }
            None => false,
        }
    }

    pub fn resume(&self, chat_id: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(chat_id);
    }
}

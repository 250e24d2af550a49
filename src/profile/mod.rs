//! Operator-supplied persona and knowledge base.
//!
//! Loaded once at startup and read-only for the life of the process. Every
//! lookup degrades to a built-in default so a missing profile never breaks
//! classification.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_BOT_NAME: &str = "Valet";
pub const DEFAULT_PERSONALITY: &str = "a helpful, concise personal assistant";
pub const DEFAULT_FALLBACK: &str = "Hmm, I'm not sure about that one.";

/// One knowledge-base rule: any pattern hit yields the answer.
///
/// Matching is case-insensitive substring; entries are tried in declaration
/// order and the first hit wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub patterns: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuickResponses {
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default)]
    pub goodbye: Option<String>,
    #[serde(default)]
    pub thanks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    #[serde(default)]
    pub owner_name: Option<String>,

    /// Free-text descriptors fed into the model prompt and used as tone
    /// for built-in replies.
    #[serde(default = "default_personality")]
    pub bot_personality: String,

    /// Overrides the built-in "nothing matched" reply.
    #[serde(default)]
    pub fallback_message: Option<String>,

    #[serde(default)]
    pub quick_responses: QuickResponses,

    #[serde(default)]
    pub knowledge_base: Vec<KnowledgeEntry>,
}

fn default_bot_name() -> String {
    DEFAULT_BOT_NAME.into()
}

fn default_personality() -> String {
    DEFAULT_PERSONALITY.into()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            owner_name: None,
            bot_personality: default_personality(),
            fallback_message: None,
            quick_responses: QuickResponses::default(),
            knowledge_base: Vec::new(),
        }
    }
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read profile at {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid profile at {}", path.display()))
    }

    /// First knowledge-base answer whose pattern appears in the lowered
    /// message, in declaration order.
    pub fn knowledge_lookup(&self, lowered: &str) -> Option<&str> {
        self.knowledge_base.iter().find_map(|entry| {
            entry
                .patterns
                .iter()
                .any(|pattern| lowered.contains(&pattern.to_lowercase()))
                .then_some(entry.answer.as_str())
        })
    }

    pub fn fallback_text(&self) -> &str {
        self.fallback_message.as_deref().unwrap_or(DEFAULT_FALLBACK)
    }
}

//! Blends the deterministic classifier with the external model.
//!
//! The classifier always runs first and is authoritative for direct answers
//! and routed actions. The model is consulted only for the residual "nothing
//! matched" case, and its failures never surface: they degrade back to the
//! already-known-good local result.

use crate::llm::{ModelClient, ModelError, PromptMessage};
use crate::nlp::classifier::Classifier;
use crate::nlp::response::{Action, ActionKind, ClassifiedResponse};
use crate::prompt::build_system_prompt;
use crate::sessions::{ConversationTurn, TurnRole};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_HISTORY_WINDOW: usize = 12;

const RATE_LIMIT_APOLOGY: &str = "Sorry, I'm a bit swamped right now. ";

pub struct Orchestrator {
    classifier: Classifier,
    model: Option<Arc<dyn ModelClient>>,
    system_prompt: String,
    history_window: usize,
}

impl Orchestrator {
    pub fn new(
        classifier: Classifier,
        model: Option<Arc<dyn ModelClient>>,
    ) -> anyhow::Result<Self> {
        // Rendered once; the profile never changes after startup.
        let system_prompt = build_system_prompt(classifier.profile())?;
        Ok(Self {
            classifier,
            model,
            system_prompt,
            history_window: DEFAULT_HISTORY_WINDOW,
        })
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window.max(1);
        self
    }

    /// Classify, then optionally escalate. Total: never returns an error.
    pub async fn respond(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> ClassifiedResponse {
        let local = self.classifier.classify(message);

        // Routed actions are never second-guessed, and a confident direct
        // answer is never overridden by a model paraphrase.
        if local.has_actions() || !local.fallback {
            return local;
        }

        let Some(model) = &self.model else {
            debug!("no model configured; returning local fallback");
            return local;
        };

        let messages = self.build_messages(message, history);
        match model.generate(&messages).await {
            Ok(raw) => merge_model_output(&raw),
            Err(ModelError::RateLimited { retry_after_secs }) => {
                warn!(retry_after_secs, "model rate-limited; degrading to local result");
                ClassifiedResponse {
                    text: format!("{RATE_LIMIT_APOLOGY}{}", local.text),
                    actions: local.actions,
                    fallback: false,
                }
            }
            Err(error) => {
                warn!(%error, "model call failed; degrading to local result");
                local
            }
        }
    }

    fn build_messages(&self, message: &str, history: &[ConversationTurn]) -> Vec<PromptMessage> {
        let skip = history.len().saturating_sub(self.history_window);
        let mut messages = Vec::with_capacity(history.len() - skip + 2);
        messages.push(PromptMessage::system(&self.system_prompt));
        for turn in &history[skip..] {
            messages.push(match turn.role {
                TurnRole::User => PromptMessage::user(&turn.content),
                TurnRole::Assistant => PromptMessage::assistant(&turn.content),
            });
        }
        messages.push(PromptMessage::user(message));
        messages
    }
}

/// Parse structured output out of the raw model text; fall back to the text
/// itself when no usable JSON is present.
fn merge_model_output(raw: &str) -> ClassifiedResponse {
    if let Some(value) = extract_json_object(raw) {
        if let Some(text) = value.get("response").and_then(|v| v.as_str()) {
            return ClassifiedResponse {
                text: text.to_string(),
                actions: normalize_commands(value.get("commands")),
                fallback: false,
            };
        }
    }
    ClassifiedResponse::answer(raw.trim())
}

/// Tolerates the JSON being embedded in prose or a fenced code block.
fn extract_json_object(raw: &str) -> Option<serde_json::Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return value.is_object().then_some(value);
    }

    let body = if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        match after.find("```") {
            Some(end) => &after[..end],
            None => after,
        }
    } else {
        trimmed
    };

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<serde_json::Value>(&body[start..=end])
        .ok()
        .filter(serde_json::Value::is_object)
}

/// Drop malformed entries; default a missing or unknown `type` to the
/// generic search kind and missing `params` to empty.
fn normalize_commands(commands: Option<&serde_json::Value>) -> Vec<Action> {
    let Some(entries) = commands.and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let entry = entry.as_object()?;
            let kind = entry
                .get("type")
                .and_then(|v| v.as_str())
                .and_then(|tag| ActionKind::from_str(tag).ok())
                .unwrap_or(ActionKind::SmartSearch);
            let parameters = entry
                .get("params")
                .and_then(|v| v.as_object())
                .map(|params| params.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default();
            Some(Action { kind, parameters })
        })
        .collect()
}

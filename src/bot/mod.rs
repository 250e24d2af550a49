//! The outermost seam: one inbound message in, one combined reply out.
//!
//! This is the single place a failure may become user-visible, and the only
//! thing it is allowed to say is a generic apology — no stack traces, no
//! internals.

use crate::executor::{MediaAttachment, TaskExecutor};
use crate::orchestrator::Orchestrator;
use crate::sessions::{ConversationTurn, PauseMap, SessionStore};
use std::sync::Arc;
use tracing::{debug, error, info};

const RESULTS_HEADER: &str = "[results]";
const PIPELINE_APOLOGY: &str = "Sorry, something went wrong on my end. Please try again.";

/// Who sent the message and in which chat.
#[derive(Debug, Clone)]
pub struct SenderContext {
    pub sender_id: String,
    pub chat_id: String,
}

impl SenderContext {
    pub fn new(sender_id: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            chat_id: chat_id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub attachments: Vec<MediaAttachment>,
}

pub struct Bot {
    orchestrator: Orchestrator,
    sessions: SessionStore,
    pauses: PauseMap,
    executor: Arc<dyn TaskExecutor>,
}

impl Bot {
    pub fn new(
        orchestrator: Orchestrator,
        sessions: SessionStore,
        executor: Arc<dyn TaskExecutor>,
    ) -> Self {
        Self {
            orchestrator,
            sessions,
            pauses: PauseMap::new(),
            executor,
        }
    }

    /// Owner takeover: suppress automated replies in a chat for a while.
    pub fn pause_chat(&self, chat_id: &str, minutes: i64) {
        self.pauses.pause(chat_id, minutes);
    }

    pub fn resume_chat(&self, chat_id: &str) {
        self.pauses.resume(chat_id);
    }

    /// Handle one message. `None` means the chat is paused and the transport
    /// should stay silent.
    pub async fn handle(&self, message: &str, ctx: &SenderContext) -> Option<Reply> {
        if self.pauses.is_paused(&ctx.chat_id) {
            debug!(chat_id = %ctx.chat_id, "chat paused; suppressing reply");
            return None;
        }

        let reply = match self.handle_inner(message, ctx).await {
            Ok(reply) => reply,
            Err(cause) => {
                error!(%cause, "pipeline failed; replying with generic apology");
                Reply {
                    text: PIPELINE_APOLOGY.to_string(),
                    attachments: Vec::new(),
                }
            }
        };
        Some(reply)
    }

    async fn handle_inner(&self, message: &str, ctx: &SenderContext) -> anyhow::Result<Reply> {
        let history = self.sessions.history(&ctx.sender_id);
        let response = self.orchestrator.respond(message, &history).await;

        let mut text = response.text.clone();
        let mut attachments = Vec::new();

        if response.has_actions() {
            let mut results = Vec::with_capacity(response.actions.len());
            for action in &response.actions {
                let outcome = self.executor.execute(action).await;
                attachments.extend(outcome.attachments);
                if outcome.success {
                    if let Some(output) = outcome.output {
                        results.push(output);
                    }
                } else if let Some(cause) = outcome.error {
                    // Failed actions are reported inline; the rest continue.
                    results.push(format!("{}: {cause}", action.kind));
                }
            }
            if !results.is_empty() {
                text.push_str("\n\n");
                text.push_str(RESULTS_HEADER);
                text.push('\n');
                text.push_str(&results.join("\n"));
            }
        }

        self.sessions
            .append(&ctx.sender_id, ConversationTurn::user(message));
        self.sessions
            .append(&ctx.sender_id, ConversationTurn::assistant(&text));

        info!(
            sender = %ctx.sender_id,
            actions = response.actions.len(),
            "message handled"
        );

        Ok(Reply { text, attachments })
    }

    #[cfg(test)]
    fn turn_count(&self, sender_id: &str) -> usize {
        self.sessions.turn_count(sender_id)
    }
}

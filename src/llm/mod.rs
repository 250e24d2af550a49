//! External generative-model contract.
//!
//! The orchestrator only ever sees this seam: ordered prompt messages in, raw
//! text out, with rate limiting distinguishable from every other failure.

pub mod compatible;

pub use compatible::CompatibleClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub text: String,
}

impl PromptMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model rate-limited (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("model request failed: {0}")]
    Request(String),
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Client identifier for logs.
    fn name(&self) -> &str;

    /// One prompt in, raw text out. No retries at this layer.
    async fn generate(&self, messages: &[PromptMessage]) -> Result<String, ModelError>;
}

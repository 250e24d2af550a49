//! OpenAI-compatible chat-completions client.
//!
//! Works against any endpoint speaking the `/chat/completions` shape. HTTP
//! 429 maps to `ModelError::RateLimited` so the orchestrator can degrade to
//! the local result with an apology instead of erroring.

use super::{ModelClient, ModelError, PromptMessage, PromptRole};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

pub struct CompatibleClient {
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    base_url: String,
    model: String,
    temperature: f64,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl CompatibleClient {
    pub fn new(base_url: &str, api_key: Option<&str>, model: &str, temperature: f64) -> Self {
        Self {
            cached_auth_header: api_key.map(|key| format!("Bearer {key}")),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature,
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn wire_messages<'a>(messages: &'a [PromptMessage]) -> Vec<WireMessage<'a>> {
        messages
            .iter()
            .map(|message| WireMessage {
                role: match message.role {
                    PromptRole::System => "system",
                    PromptRole::User => "user",
                    PromptRole::Assistant => "assistant",
                },
                content: &message.text,
            })
            .collect()
    }
}

fn retry_after_secs(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

#[async_trait]
impl ModelClient for CompatibleClient {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn generate(&self, messages: &[PromptMessage]) -> Result<String, ModelError> {
        let body = ChatRequest {
            model: &self.model,
            messages: Self::wire_messages(messages),
            temperature: self.temperature,
        };

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(auth) = &self.cached_auth_header {
            request = request.header("Authorization", auth);
        }

        let response = request
            .send()
            .await
            .map_err(|error| ModelError::Request(error.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after_secs = retry_after_secs(&response);
            debug!(retry_after_secs, "model endpoint rate-limited");
            return Err(ModelError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ModelError::Request(format!("{status}: {detail}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|error| ModelError::Request(format!("malformed response: {error}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ModelError::Request("response carried no text".into()))
    }
}

//! Task-executor seam.
//!
//! The core never interprets an outcome beyond concatenating its output; a
//! failed action is reported inline and never retried. `LinkExecutor` is the
//! built-in implementation: it answers search actions with provider URLs,
//! fully offline.

use crate::nlp::response::{Action, ActionKind};
use async_trait::async_trait;
use url::Url;

#[derive(Debug, Clone)]
pub struct MediaAttachment {
    pub mime_type: String,
    pub data: MediaData,
    pub filename: Option<String>,
}

#[derive(Debug, Clone)]
pub enum MediaData {
    Url(String),
    Bytes(Vec<u8>),
}

/// Result of executing one action.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub output: Option<String>,
    pub attachments: Vec<MediaAttachment>,
    pub error: Option<String>,
}

impl ExecutionOutcome {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            attachments: Vec::new(),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            attachments: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// External capability boundary — implement for any side-effecting backend.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    fn name(&self) -> &str;

    /// Execute one action. Failures are reported in the outcome, never
    /// raised; the facade continues with the remaining actions either way.
    async fn execute(&self, action: &Action) -> ExecutionOutcome;
}

/// Turns search actions into provider links without touching the network.
pub struct LinkExecutor;

impl LinkExecutor {
    fn link_for(kind: ActionKind, query: &str) -> Result<Url, url::ParseError> {
        match kind {
            ActionKind::SportsSearch | ActionKind::GameSearch | ActionKind::SmartSearch => {
                Url::parse_with_params("https://www.google.com/search", [("q", query)])
            }
            ActionKind::NewsSearch => {
                Url::parse_with_params("https://news.google.com/search", [("q", query)])
            }
            ActionKind::PersonSearch => {
                Url::parse_with_params("https://en.wikipedia.org/w/index.php", [("search", query)])
            }
            ActionKind::MusicSearch => {
                Url::parse_with_params("https://music.youtube.com/search", [("q", query)])
            }
            ActionKind::MovieSearch => {
                Url::parse_with_params("https://www.imdb.com/find/", [("q", query)])
            }
            ActionKind::YoutubeSearch => Url::parse_with_params(
                "https://www.youtube.com/results",
                [("search_query", query)],
            ),
            ActionKind::AmazonSearch => {
                Url::parse_with_params("https://www.amazon.com/s", [("k", query)])
            }
            ActionKind::LocationSearch => Url::parse_with_params(
                "https://www.google.com/maps/search/",
                [("api", "1"), ("query", query)],
            ),
            ActionKind::ImageSearch => Url::parse_with_params(
                "https://www.google.com/search",
                [("tbm", "isch"), ("q", query)],
            ),
        }
    }
}

#[async_trait]
impl TaskExecutor for LinkExecutor {
    fn name(&self) -> &str {
        "links"
    }

    async fn execute(&self, action: &Action) -> ExecutionOutcome {
        let Some(query) = action.query() else {
            return ExecutionOutcome::fail(format!("{} action carried no query", action.kind));
        };
        match Self::link_for(action.kind, query) {
            Ok(link) => ExecutionOutcome::ok(link.to_string()),
            Err(error) => ExecutionOutcome::fail(format!("could not build link: {error}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExecutionOutcome, LinkExecutor, TaskExecutor};
    use crate::nlp::response::{Action, ActionKind};

    #[tokio::test]
    async fn every_search_kind_yields_a_link() {
        let kinds = [
            ActionKind::SportsSearch,
            ActionKind::NewsSearch,
            ActionKind::PersonSearch,
            ActionKind::MusicSearch,
            ActionKind::MovieSearch,
            ActionKind::YoutubeSearch,
            ActionKind::AmazonSearch,
            ActionKind::LocationSearch,
            ActionKind::GameSearch,
            ActionKind::ImageSearch,
            ActionKind::SmartSearch,
        ];
        for kind in kinds {
            let outcome = LinkExecutor
                .execute(&Action::search(kind, "rust lang"))
                .await;
            assert!(outcome.success, "kind {kind} failed");
            assert!(outcome.output.unwrap().starts_with("https://"));
        }
    }

    #[tokio::test]
    async fn queries_are_percent_encoded() {
        let outcome = LinkExecutor
            .execute(&Action::search(ActionKind::SmartSearch, "weather in Oslo"))
            .await;
        assert!(outcome.output.unwrap().contains("weather+in+Oslo"));
    }

    #[tokio::test]
    async fn missing_query_is_a_reported_failure() {
        let outcome = LinkExecutor
            .execute(&Action::new(ActionKind::SmartSearch))
            .await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("no query"));
    }

    #[test]
    fn outcome_constructors() {
        assert!(ExecutionOutcome::ok("done").success);
        assert!(!ExecutionOutcome::fail("nope").success);
    }
}

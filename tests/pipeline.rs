//! End-to-end pipeline tests: message in, combined reply out, through the
//! real classifier, orchestrator, session store and executor.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use valet::bot::{Bot, SenderContext};
use valet::executor::LinkExecutor;
use valet::llm::{ModelClient, ModelError, PromptMessage};
use valet::nlp::Classifier;
use valet::orchestrator::Orchestrator;
use valet::profile::{KnowledgeEntry, Profile, QuickResponses};
use valet::sessions::{ConversationTurn, SessionStore};

fn test_profile() -> Profile {
    Profile {
        owner_name: Some("Arjun".into()),
        quick_responses: QuickResponses {
            greeting: Some("Hello! Arjun's assistant here.".into()),
            ..QuickResponses::default()
        },
        knowledge_base: vec![KnowledgeEntry {
            patterns: vec!["office hours".into()],
            answer: "9 to 5, Monday through Friday.".into(),
        }],
        ..Profile::default()
    }
}

fn offline_bot() -> Bot {
    let classifier = Classifier::new(Arc::new(test_profile()));
    let orchestrator = Orchestrator::new(classifier, None).unwrap();
    Bot::new(orchestrator, SessionStore::default(), Arc::new(LinkExecutor))
}

fn bot_with_model(model: Arc<dyn ModelClient>) -> Bot {
    let classifier = Classifier::new(Arc::new(test_profile()));
    let orchestrator = Orchestrator::new(classifier, Some(model)).unwrap();
    Bot::new(orchestrator, SessionStore::default(), Arc::new(LinkExecutor))
}

fn ctx() -> SenderContext {
    SenderContext::new("arjun", "chat-arjun")
}

// ─── Local answers ──────────────────────────────────────────────────────────

#[tokio::test]
async fn arithmetic_is_answered_inline() {
    let reply = offline_bot().handle("what is (2 + 3) * 4", &ctx()).await.unwrap();
    assert_eq!(reply.text, "20");
}

#[tokio::test]
async fn word_math_is_answered_inline() {
    let reply = offline_bot()
        .handle("two plus three times four", &ctx())
        .await
        .unwrap();
    assert_eq!(reply.text, "14");
}

#[tokio::test]
async fn temperature_conversion_is_answered_inline() {
    let reply = offline_bot().handle("30c to f", &ctx()).await.unwrap();
    assert!(reply.text.contains("86.0°F"), "got: {}", reply.text);
}

#[tokio::test]
async fn knowledge_base_beats_everything_downstream() {
    let reply = offline_bot()
        .handle("what are your office hours?", &ctx())
        .await
        .unwrap();
    assert_eq!(reply.text, "9 to 5, Monday through Friday.");
}

#[tokio::test]
async fn greeting_uses_the_profile_override() {
    let reply = offline_bot().handle("hello there", &ctx()).await.unwrap();
    assert_eq!(reply.text, "Hello! Arjun's assistant here.");
}

// ─── Search routing and execution ───────────────────────────────────────────

#[tokio::test]
async fn sports_query_yields_a_search_link() {
    let reply = offline_bot().handle("IPL score today", &ctx()).await.unwrap();
    assert!(reply.text.contains("[results]"));
    assert!(reply.text.contains("https://www.google.com/search"));
    // The original casing survives into the query.
    assert!(reply.text.contains("IPL"));
}

#[tokio::test]
async fn weather_query_routes_without_escalation() {
    let reply = offline_bot()
        .handle("weather in Oslo please", &ctx())
        .await
        .unwrap();
    assert!(reply.text.contains("[results]"));
    assert!(reply.text.contains("Oslo"));
}

#[tokio::test]
async fn unmatched_multiword_message_falls_back_to_search_offline() {
    let reply = offline_bot()
        .handle("quantum chromodynamics lattice results", &ctx())
        .await
        .unwrap();
    assert!(reply.text.contains("https://"), "got: {}", reply.text);
}

// ─── Model escalation and degradation ───────────────────────────────────────

struct CountingModel {
    calls: AtomicUsize,
}

#[async_trait]
impl ModelClient for CountingModel {
    fn name(&self) -> &str {
        "counting"
    }
    async fn generate(&self, _messages: &[PromptMessage]) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("model says hi".to_string())
    }
}

#[tokio::test]
async fn confident_local_answers_never_reach_the_model() {
    let model = Arc::new(CountingModel {
        calls: AtomicUsize::new(0),
    });
    let bot = bot_with_model(model.clone());

    bot.handle("what is 2 + 2", &ctx()).await.unwrap();
    bot.handle("IPL score today", &ctx()).await.unwrap();
    bot.handle("what are your office hours", &ctx()).await.unwrap();

    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn terminal_fallback_escalates_to_the_model() {
    let model = Arc::new(CountingModel {
        calls: AtomicUsize::new(0),
    });
    let bot = bot_with_model(model.clone());

    // Single token, no local stage claims it, so the model gets a shot.
    let reply = bot.handle("sonder", &ctx()).await.unwrap();
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    assert_eq!(reply.text, "model says hi");
}

struct RateLimitedModel;

#[async_trait]
impl ModelClient for RateLimitedModel {
    fn name(&self) -> &str {
        "rate-limited"
    }
    async fn generate(&self, _messages: &[PromptMessage]) -> Result<String, ModelError> {
        Err(ModelError::RateLimited {
            retry_after_secs: 30,
        })
    }
}

#[tokio::test]
async fn rate_limited_model_degrades_to_an_apologetic_local_reply() {
    let bot = bot_with_model(Arc::new(RateLimitedModel));
    let reply = bot.handle("sonder", &ctx()).await.unwrap();
    assert!(reply.text.starts_with("Sorry, I'm a bit swamped"));
}

struct FailingModel;

#[async_trait]
impl ModelClient for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }
    async fn generate(&self, _messages: &[PromptMessage]) -> Result<String, ModelError> {
        Err(ModelError::Request("boom".to_string()))
    }
}

#[tokio::test]
async fn model_failure_degrades_to_the_local_decision() {
    let bot = bot_with_model(Arc::new(FailingModel));
    let reply = bot.handle("sonder", &ctx()).await.unwrap();
    // The local fallback text, never the error.
    assert!(!reply.text.contains("boom"));
    assert!(!reply.text.is_empty());
}

// ─── Sessions ───────────────────────────────────────────────────────────────

#[test]
fn session_history_is_bounded() {
    let store = SessionStore::new(20);
    for i in 0..25 {
        store.append("arjun", ConversationTurn::user(format!("turn {i}")));
    }
    let history = store.history("arjun");
    assert_eq!(history.len(), 20);
    assert_eq!(history[0].content, "turn 5");
    assert_eq!(history[19].content, "turn 24");
}

#[tokio::test]
async fn senders_do_not_share_history() {
    let bot = offline_bot();
    let alice = SenderContext::new("alice", "chat-alice");
    let bob = SenderContext::new("bob", "chat-bob");

    bot.handle("what is 1 + 1", &alice).await.unwrap();
    let reply = bot.handle("what is 2 + 2", &bob).await.unwrap();
    assert_eq!(reply.text, "4");
}

// ─── Pause / takeover ───────────────────────────────────────────────────────

#[tokio::test]
async fn paused_chat_is_silent_until_resumed() {
    let bot = offline_bot();
    bot.pause_chat("chat-arjun", 30);
    assert!(bot.handle("hello", &ctx()).await.is_none());

    bot.resume_chat("chat-arjun");
    assert!(bot.handle("hello", &ctx()).await.is_some());
}

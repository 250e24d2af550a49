//! The local intent classifier: a fixed, ordered cascade of pattern stages.
//!
//! Stages are tried top to bottom with no backtracking; the first stage that
//! claims the message wins. The cascade is total — every input ends in a
//! `ClassifiedResponse`, never an error.

use super::convert::{self, FixedRate, RateSource};
use super::mathexpr;
use super::patterns;
use super::response::{Action, ActionKind, ClassifiedResponse};
use crate::profile::Profile;
use chrono::Local;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

const GREETING_VARIANTS: &[&str] = &[
    "Hey there!",
    "Hello! How can I help?",
    "Hi! What can I do for you today?",
];

const THANKS_VARIANTS: &[&str] = &["You're welcome!", "Anytime!", "Happy to help!"];

const GOODBYE_VARIANTS: &[&str] = &["Goodbye!", "See you later!", "Take care!"];

const HOW_ARE_YOU_VARIANTS: &[&str] = &[
    "Doing great, thanks for asking!",
    "All good here. How are you?",
    "Never better. What can I do for you?",
];

const JOKE_VARIANTS: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "I told my computer I needed a break, and it said 'no problem, I'll go to sleep.'",
    "There are only 10 kinds of people: those who understand binary and those who don't.",
    "Why did the developer go broke? Because they used up all their cache.",
];

const COMPLIMENT_VARIANTS: &[&str] = &["Aw, thanks!", "You just made my day.", "I do my best!"];

const HELP_TEXT: &str = "Here's what I can do:\n\
- arithmetic, including word math (\"two plus three\")\n\
- time, date and day of the week\n\
- unit conversions (°C/°F, km/miles, kg/lbs, USD/INR)\n\
- look things up: sports, news, people, music, movies, videos, shopping, places, games, images\n\
- random numbers, dice rolls and coin flips\n\
Just ask in plain language.";

fn pick(options: &[&'static str]) -> &'static str {
    options[rand::rng().random_range(0..options.len())]
}

/// Per-message view handed to each cascade stage.
struct StageInput<'a> {
    /// Original-case text, used for Action parameters.
    original: &'a str,
    /// Lower-cased copy, used for all matching.
    lowered: &'a str,
    profile: &'a Profile,
    rates: &'a dyn RateSource,
}

type Stage = fn(&StageInput<'_>) -> Option<ClassifiedResponse>;

/// The cascade, in evaluation order. Kept as data so tests can enumerate
/// stages and their priority independently of control flow.
const STAGES: &[(&str, Stage)] = &[
    ("math", stage_math),
    ("knowledge_base", stage_knowledge_base),
    ("common_questions", stage_common_questions),
    ("search_routing", stage_search_routing),
    ("conversational", stage_conversational),
];

pub struct Classifier {
    profile: Arc<Profile>,
    rates: Arc<dyn RateSource>,
}

impl Classifier {
    pub fn new(profile: Arc<Profile>) -> Self {
        Self {
            profile,
            rates: Arc::new(FixedRate::default()),
        }
    }

    pub fn with_rates(profile: Arc<Profile>, rates: Arc<dyn RateSource>) -> Self {
        Self { profile, rates }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Run the cascade. Total: always returns a response.
    pub fn classify(&self, message: &str) -> ClassifiedResponse {
        let original = message.trim();
        let lowered = original.to_lowercase();
        let input = StageInput {
            original,
            lowered: &lowered,
            profile: &self.profile,
            rates: self.rates.as_ref(),
        };

        for (name, stage) in STAGES {
            if let Some(response) = stage(&input) {
                debug!(stage = name, "cascade stage claimed message");
                return response;
            }
        }

        stage_fallback(&input)
    }
}

// ─── Stage 1: math ──────────────────────────────────────────────────────────

fn stage_math(input: &StageInput<'_>) -> Option<ClassifiedResponse> {
    let value = mathexpr::evaluate(input.original)?;
    Some(ClassifiedResponse::answer(mathexpr::format_result(value)))
}

// ─── Stage 2: knowledge base ────────────────────────────────────────────────

fn stage_knowledge_base(input: &StageInput<'_>) -> Option<ClassifiedResponse> {
    input
        .profile
        .knowledge_lookup(input.lowered)
        .map(ClassifiedResponse::answer)
}

// ─── Stage 3: common questions ──────────────────────────────────────────────

fn stage_common_questions(input: &StageInput<'_>) -> Option<ClassifiedResponse> {
    let lowered = input.lowered;

    if patterns::matches_any(lowered, patterns::TIME_PATTERNS) {
        let now = Local::now();
        return Some(ClassifiedResponse::answer(format!(
            "It's {}.",
            now.format("%I:%M %p")
        )));
    }
    if patterns::matches_any(lowered, patterns::DATE_PATTERNS) {
        let now = Local::now();
        return Some(ClassifiedResponse::answer(format!(
            "Today is {}.",
            now.format("%A, %B %-d, %Y")
        )));
    }
    if patterns::matches_any(lowered, patterns::DAY_PATTERNS) {
        let now = Local::now();
        return Some(ClassifiedResponse::answer(format!(
            "It's {}.",
            now.format("%A")
        )));
    }
    if patterns::matches_any(lowered, patterns::WEATHER_PATTERNS) {
        return Some(ClassifiedResponse::with_actions(
            "Let me check the weather for you.",
            vec![Action::search(ActionKind::SmartSearch, input.original)],
        ));
    }
    if let Some(answer) = convert::convert(lowered, input.rates) {
        return Some(ClassifiedResponse::answer(answer));
    }
    if patterns::matches_any(lowered, patterns::DICE_PATTERNS) {
        let roll = rand::rng().random_range(1..=6);
        return Some(ClassifiedResponse::answer(format!("You rolled a {roll}.")));
    }
    if patterns::matches_any(lowered, patterns::COIN_PATTERNS) {
        let face = if rand::rng().random_range(0..2) == 0 {
            "heads"
        } else {
            "tails"
        };
        return Some(ClassifiedResponse::answer(format!("It's {face}!")));
    }
    if patterns::matches_any(lowered, patterns::RANDOM_NUMBER_PATTERNS) {
        let number = rand::rng().random_range(1..=100);
        return Some(ClassifiedResponse::answer(format!(
            "Your number is {number}."
        )));
    }

    None
}

// ─── Stage 4: search-intent routing ─────────────────────────────────────────

fn stage_search_routing(input: &StageInput<'_>) -> Option<ClassifiedResponse> {
    if let Some(category) = patterns::route_search(input.lowered) {
        let query = search_query(category.kind, input);
        let ack = match category.kind {
            ActionKind::SportsSearch => "Let me grab the latest for you.",
            ActionKind::NewsSearch => "Fetching the headlines.",
            _ => "Let me look that up.",
        };
        return Some(ClassifiedResponse::with_actions(
            ack,
            vec![Action::search(category.kind, query)],
        ));
    }

    // Generic interrogative: a multi-word question nothing else claimed.
    // Conversational phrasings ("how are you") stay with the next stage.
    if patterns::is_interrogative(input.lowered)
        && input.original.split_whitespace().count() >= 3
        && !is_conversational(input.lowered)
    {
        return Some(ClassifiedResponse::with_actions(
            "Let me look that up.",
            vec![Action::search(ActionKind::SmartSearch, input.original)],
        ));
    }

    None
}

/// Per-kind query cleanup; everything else passes the original text through.
fn search_query(kind: ActionKind, input: &StageInput<'_>) -> String {
    match kind {
        ActionKind::NewsSearch => {
            let kept: Vec<&str> = input
                .original
                .split_whitespace()
                .filter(|token| {
                    !patterns::NEWS_STOPWORDS.contains(&token.to_lowercase().as_str())
                })
                .collect();
            if kept.is_empty() {
                input.original.to_string()
            } else {
                kept.join(" ")
            }
        }
        ActionKind::PersonSearch => {
            for prefix in patterns::PERSON_PREFIXES {
                // The prefix matched the lowered copy; lowercasing can change
                // byte widths, so the offset may not be a char boundary in
                // the original. Keep the unstripped query in that case.
                if input.lowered.starts_with(prefix) {
                    if let Some(rest) = input.original.get(prefix.len()..) {
                        let rest = rest.trim();
                        if !rest.is_empty() {
                            return rest.to_string();
                        }
                    }
                }
            }
            input.original.to_string()
        }
        _ => input.original.to_string(),
    }
}

fn is_conversational(lowered: &str) -> bool {
    patterns::matches_any(lowered, patterns::GREETING_PATTERNS)
        || patterns::matches_any(lowered, patterns::THANKS_PATTERNS)
        || patterns::matches_any(lowered, patterns::GOODBYE_PATTERNS)
        || patterns::matches_any(lowered, patterns::HOW_ARE_YOU_PATTERNS)
        || patterns::matches_any(lowered, patterns::WHO_ARE_YOU_PATTERNS)
        || patterns::matches_any(lowered, patterns::JOKE_PATTERNS)
        || patterns::matches_any(lowered, patterns::HELP_PATTERNS)
        || patterns::matches_any(lowered, patterns::COMPLIMENT_PATTERNS)
}

// ─── Stage 5: conversational replies ────────────────────────────────────────

fn stage_conversational(input: &StageInput<'_>) -> Option<ClassifiedResponse> {
    let lowered = input.lowered;
    let profile = input.profile;

    if patterns::matches_any(lowered, patterns::GREETING_PATTERNS) {
        let text = profile
            .quick_responses
            .greeting
            .clone()
            .unwrap_or_else(|| pick(GREETING_VARIANTS).to_string());
        return Some(ClassifiedResponse::answer(text));
    }
    if patterns::matches_any(lowered, patterns::THANKS_PATTERNS) {
        let text = profile
            .quick_responses
            .thanks
            .clone()
            .unwrap_or_else(|| pick(THANKS_VARIANTS).to_string());
        return Some(ClassifiedResponse::answer(text));
    }
    if patterns::matches_any(lowered, patterns::GOODBYE_PATTERNS) {
        let text = profile
            .quick_responses
            .goodbye
            .clone()
            .unwrap_or_else(|| pick(GOODBYE_VARIANTS).to_string());
        return Some(ClassifiedResponse::answer(text));
    }
    if patterns::matches_any(lowered, patterns::HOW_ARE_YOU_PATTERNS) {
        return Some(ClassifiedResponse::answer(pick(HOW_ARE_YOU_VARIANTS)));
    }
    if patterns::matches_any(lowered, patterns::WHO_ARE_YOU_PATTERNS) {
        let mut text = format!("I'm {}, {}.", profile.bot_name, profile.bot_personality);
        if let Some(owner) = &profile.owner_name {
            text.push_str(&format!(" I look after things for {owner}."));
        }
        return Some(ClassifiedResponse::answer(text));
    }
    if patterns::matches_any(lowered, patterns::JOKE_PATTERNS) {
        return Some(ClassifiedResponse::answer(pick(JOKE_VARIANTS)));
    }
    if patterns::matches_any(lowered, patterns::HELP_PATTERNS) {
        return Some(ClassifiedResponse::answer(HELP_TEXT));
    }
    if patterns::matches_any(lowered, patterns::COMPLIMENT_PATTERNS) {
        return Some(ClassifiedResponse::answer(pick(COMPLIMENT_VARIANTS)));
    }

    None
}

// ─── Stage 6: terminal fallback ─────────────────────────────────────────────

fn stage_fallback(input: &StageInput<'_>) -> ClassifiedResponse {
    if input.original.split_whitespace().count() >= 2 {
        let mut response = ClassifiedResponse::with_actions(
            "Let me look that up.",
            vec![Action::search(ActionKind::SmartSearch, input.original)],
        );
        response.fallback = true;
        response
    } else {
        ClassifiedResponse::fallback(input.profile.fallback_text())
    }
}

#[cfg(test)]
mod tests {
    use super::Classifier;
    use crate::nlp::response::ActionKind;
    use crate::profile::{KnowledgeEntry, Profile};
    use std::sync::Arc;

    fn classifier() -> Classifier {
        Classifier::new(Arc::new(Profile::default()))
    }

    fn classifier_with(profile: Profile) -> Classifier {
        Classifier::new(Arc::new(profile))
    }

    #[test]
    fn math_wins_the_cascade() {
        let response = classifier().classify("what is 12 + 3 * 2");
        assert_eq!(response.text, "18");
        assert!(response.actions.is_empty());
    }

    #[test]
    fn knowledge_base_beats_common_questions() {
        let profile = Profile {
            knowledge_base: vec![KnowledgeEntry {
                patterns: vec!["time".into()],
                answer: "Time is an illusion.".into(),
            }],
            ..Profile::default()
        };
        let response = classifier_with(profile).classify("what time is it");
        assert_eq!(response.text, "Time is an illusion.");
    }

    #[test]
    fn time_question_answers_with_clock() {
        let response = classifier().classify("what time is it");
        assert!(response.text.contains("It's"));
        assert!(response.actions.is_empty());
        assert!(response.text.contains("AM") || response.text.contains("PM"));
    }

    #[test]
    fn unit_conversion_fires_inline() {
        let response = classifier().classify("30c to f");
        assert!(response.text.contains("86.0°F"), "got: {}", response.text);
        assert!(response.actions.is_empty());
    }

    #[test]
    fn weather_emits_a_search_action() {
        let response = classifier().classify("weather in Oslo");
        assert_eq!(response.actions.len(), 1);
        assert_eq!(response.actions[0].kind, ActionKind::SmartSearch);
        assert_eq!(response.actions[0].query(), Some("weather in Oslo"));
    }

    #[test]
    fn sports_routing_preserves_original_case() {
        let response = classifier().classify("IPL score today");
        assert_eq!(response.actions.len(), 1);
        assert_eq!(response.actions[0].kind, ActionKind::SportsSearch);
        assert_eq!(response.actions[0].query(), Some("IPL score today"));
    }

    #[test]
    fn sports_outranks_news_on_mixed_keywords() {
        let response = classifier().classify("cricket news");
        assert_eq!(response.actions[0].kind, ActionKind::SportsSearch);
    }

    #[test]
    fn news_query_drops_news_tokens() {
        let response = classifier().classify("latest Mars rover news");
        assert_eq!(response.actions[0].kind, ActionKind::NewsSearch);
        assert_eq!(response.actions[0].query(), Some("Mars rover"));
    }

    #[test]
    fn person_query_strips_leading_phrase() {
        let response = classifier().classify("who is Ada Lovelace");
        assert_eq!(response.actions[0].kind, ActionKind::PersonSearch);
        assert_eq!(response.actions[0].query(), Some("Ada Lovelace"));
    }

    #[test]
    fn multibyte_lowercase_widths_never_split_the_query() {
        // U+212A (KELVIN SIGN) lowercases to ASCII 'k', so byte offsets in
        // the lowered copy do not line up with the original text. The
        // query falls back to the unstripped original rather than slicing.
        let response = classifier().classify("wi\u{212A}i rust language");
        assert_eq!(response.actions[0].kind, ActionKind::PersonSearch);
        assert_eq!(response.actions[0].query(), Some("wi\u{212A}i rust language"));
    }

    #[test]
    fn how_are_you_stays_conversational() {
        let response = classifier().classify("how are you");
        assert!(response.actions.is_empty());
        assert!(!response.fallback);
    }

    #[test]
    fn who_are_you_uses_profile_persona() {
        let profile = Profile {
            bot_name: "Jeeves".into(),
            owner_name: Some("Arjun".into()),
            ..Profile::default()
        };
        let response = classifier_with(profile).classify("who are you?");
        assert!(response.text.contains("Jeeves"));
        assert!(response.text.contains("Arjun"));
    }

    #[test]
    fn greeting_prefers_quick_response() {
        let mut profile = Profile::default();
        profile.quick_responses.greeting = Some("Namaste! The boss is away.".into());
        let response = classifier_with(profile).classify("hello");
        assert_eq!(response.text, "Namaste! The boss is away.");
    }

    #[test]
    fn multi_word_mystery_becomes_generic_search() {
        let response = classifier().classify("blorple frangible quux");
        assert_eq!(response.actions.len(), 1);
        assert_eq!(response.actions[0].kind, ActionKind::SmartSearch);
        assert_eq!(response.actions[0].query(), Some("blorple frangible quux"));
        assert!(response.fallback);
    }

    #[test]
    fn single_token_mystery_gets_fallback_text() {
        let profile = Profile {
            fallback_message: Some("No idea, sorry!".into()),
            ..Profile::default()
        };
        let response = classifier_with(profile).classify("blorp");
        assert_eq!(response.text, "No idea, sorry!");
        assert!(response.actions.is_empty());
        assert!(response.fallback);
    }

    #[test]
    fn deterministic_for_non_random_stages() {
        let classifier = classifier();
        let first = classifier.classify("12 * 12");
        let second = classifier.classify("12 * 12");
        assert_eq!(first, second);
    }

    #[test]
    fn dangerous_text_never_reaches_an_evaluator() {
        let response = classifier().classify("require('fs') && process.exit()");
        // Falls through math; ends as a generic search, never a computed value.
        assert!(response.text.parse::<f64>().is_err());
    }
}

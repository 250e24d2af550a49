use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumString};

/// Closed set of deferred-work tags the classifier and orchestrator may emit.
///
/// The executor receives these verbatim; the wire form is snake_case
/// (`sports_search`, `smart_search`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    SportsSearch,
    NewsSearch,
    PersonSearch,
    MusicSearch,
    MovieSearch,
    YoutubeSearch,
    AmazonSearch,
    LocationSearch,
    GameSearch,
    ImageSearch,
    SmartSearch,
}

/// A declarative unit of work for the external executor.
///
/// Never carries executable content — only a kind tag and scalar parameters.
/// Created by the classifier or orchestrator, consumed exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            parameters: BTreeMap::new(),
        }
    }

    /// Search action carrying the original-case query text.
    pub fn search(kind: ActionKind, query: impl Into<String>) -> Self {
        let mut action = Self::new(kind);
        action
            .parameters
            .insert("query".into(), serde_json::Value::String(query.into()));
        action
    }

    pub fn query(&self) -> Option<&str> {
        self.parameters.get("query").and_then(|value| value.as_str())
    }
}

/// Outcome of one classification or orchestration pass.
///
/// When `actions` is non-empty, `text` is a short acknowledgement and the
/// executor output is expected to be appended by the facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedResponse {
    pub text: String,
    #[serde(default)]
    pub actions: Vec<Action>,
    /// True only for the cascade's terminal "nothing matched" state. The
    /// orchestrator uses this to decide whether the model may be consulted;
    /// it is not part of the user-visible payload.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl ClassifiedResponse {
    /// A direct answer the cascade is confident about.
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actions: Vec::new(),
            fallback: false,
        }
    }

    /// A short acknowledgement plus deferred work for the executor.
    pub fn with_actions(text: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            text: text.into(),
            actions,
            fallback: false,
        }
    }

    /// Terminal "nothing matched" state; the only escalation-eligible result.
    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actions: Vec::new(),
            fallback: true,
        }
    }

    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, ActionKind, ClassifiedResponse};
    use std::str::FromStr;

    #[test]
    fn action_kind_snake_case_tags() {
        assert_eq!(ActionKind::SportsSearch.as_ref(), "sports_search");
        assert_eq!(ActionKind::SmartSearch.to_string(), "smart_search");
        assert_eq!(
            ActionKind::from_str("youtube_search").unwrap(),
            ActionKind::YoutubeSearch
        );
        assert!(ActionKind::from_str("launch_missiles").is_err());
    }

    #[test]
    fn search_action_carries_query() {
        let action = Action::search(ActionKind::NewsSearch, "election results");
        assert_eq!(action.kind, ActionKind::NewsSearch);
        assert_eq!(action.query(), Some("election results"));
    }

    #[test]
    fn action_serde_round_trip() {
        let action = Action::search(ActionKind::ImageSearch, "northern lights");
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["kind"], "image_search");
        let back: Action = serde_json::from_value(json).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn constructors_set_fallback_flag() {
        assert!(!ClassifiedResponse::answer("42").fallback);
        assert!(!ClassifiedResponse::with_actions(
            "On it.",
            vec![Action::new(ActionKind::SmartSearch)]
        )
        .fallback);
        assert!(ClassifiedResponse::fallback("I'm not sure.").fallback);
    }

    #[test]
    fn fallback_flag_not_serialized_when_false() {
        let answer = ClassifiedResponse::answer("42");
        let json = serde_json::to_value(&answer).unwrap();
        assert!(json.get("fallback").is_none());
    }
}

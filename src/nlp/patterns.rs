//! Keyword tables driving the classifier cascade.
//!
//! Matching is substring-based over a lower-cased copy of the message;
//! first match wins within a table and table order is the tie-break.

use super::response::ActionKind;

/// One search-intent category: a kind tag plus the keywords that claim it.
pub struct SearchCategory {
    pub kind: ActionKind,
    pub keywords: &'static [&'static str],
}

/// Fixed priority order: sports before news before person before music before
/// movie before video before shopping before location before gaming before
/// images before generic. "cricket news" therefore routes to sports.
pub static SEARCH_CATEGORIES: &[SearchCategory] = &[
    SearchCategory {
        kind: ActionKind::SportsSearch,
        keywords: &[
            "cricket", "ipl", "football", "soccer", "tennis", "nba", "score", "match today",
            "world cup", "tournament", "olympics",
        ],
    },
    SearchCategory {
        kind: ActionKind::NewsSearch,
        keywords: &[
            "news", "headline", "headlines", "breaking", "latest on", "current affairs",
        ],
    },
    SearchCategory {
        kind: ActionKind::PersonSearch,
        keywords: &["who is", "biography", "wiki ", "wikipedia", "about the person"],
    },
    SearchCategory {
        kind: ActionKind::MusicSearch,
        keywords: &["song", "music", "lyrics", "album", "playlist", "play me"],
    },
    SearchCategory {
        kind: ActionKind::MovieSearch,
        keywords: &["movie", "film", "imdb", "box office", "actor", "actress"],
    },
    SearchCategory {
        kind: ActionKind::YoutubeSearch,
        keywords: &["video", "youtube", "trailer", "watch"],
    },
    SearchCategory {
        kind: ActionKind::AmazonSearch,
        keywords: &["buy", "price of", "amazon", "purchase", "order online", "shopping"],
    },
    SearchCategory {
        kind: ActionKind::LocationSearch,
        keywords: &[
            "where is", "location of", "directions", "near me", "map of", "distance to",
        ],
    },
    SearchCategory {
        kind: ActionKind::GameSearch,
        keywords: &[
            "game", "gaming", "xbox", "playstation", "nintendo", "minecraft", "fortnite",
        ],
    },
    SearchCategory {
        kind: ActionKind::ImageSearch,
        keywords: &["image", "images", "photo", "picture", "pictures", "wallpaper"],
    },
];

/// Tokens stripped from a news query before it reaches the executor.
pub const NEWS_STOPWORDS: &[&str] = &["news", "headline", "headlines", "breaking", "latest"];

/// Leading phrases stripped from a person query.
pub const PERSON_PREFIXES: &[&str] = &["who is", "about", "biography of", "biography", "wiki"];

pub const TIME_PATTERNS: &[&str] = &["what time", "time is it", "current time", "time now"];

pub const DATE_PATTERNS: &[&str] = &["what date", "date today", "today's date", "todays date"];

pub const DAY_PATTERNS: &[&str] = &["what day", "day is it", "day of the week"];

pub const WEATHER_PATTERNS: &[&str] = &["weather", "temperature in", "forecast", "raining"];

pub const RANDOM_NUMBER_PATTERNS: &[&str] = &["random number", "pick a number"];

pub const DICE_PATTERNS: &[&str] = &["roll a dice", "roll a die", "roll the dice", "throw a dice"];

pub const COIN_PATTERNS: &[&str] = &["flip a coin", "toss a coin", "coin flip", "coin toss"];

pub const GREETING_PATTERNS: &[&str] = &[
    "hello", "hey", "good morning", "good afternoon", "good evening", "namaste", "hola",
];

pub const THANKS_PATTERNS: &[&str] = &["thank", "thanks", "thx", "appreciate it"];

pub const GOODBYE_PATTERNS: &[&str] = &["bye", "goodbye", "good night", "goodnight", "see you"];

pub const HOW_ARE_YOU_PATTERNS: &[&str] = &["how are you", "how r u", "how's it going", "hows it going"];

pub const WHO_ARE_YOU_PATTERNS: &[&str] = &["who are you", "what are you", "your name"];

pub const JOKE_PATTERNS: &[&str] = &["joke", "make me laugh", "something funny"];

pub const HELP_PATTERNS: &[&str] = &["help", "what can you do", "commands", "how do you work"];

pub const COMPLIMENT_PATTERNS: &[&str] = &[
    "good bot", "nice bot", "well done", "awesome", "you are great", "you're great", "love you",
];

/// Question openers that mark a multi-word message as a generic search.
pub const INTERROGATIVE_STARTERS: &[&str] = &[
    "what", "how", "why", "when", "which", "where", "who", "can ", "does", "is ", "are ",
];

/// Substring check against a keyword table.
pub fn matches_any(lowered: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| lowered.contains(needle))
}

/// First search category whose keywords claim the message, in priority order.
pub fn route_search(lowered: &str) -> Option<&'static SearchCategory> {
    SEARCH_CATEGORIES
        .iter()
        .find(|category| matches_any(lowered, category.keywords))
}

/// True when the message reads like a free-form question.
pub fn is_interrogative(lowered: &str) -> bool {
    INTERROGATIVE_STARTERS
        .iter()
        .any(|starter| lowered.starts_with(starter))
        || lowered.contains("search for")
        || lowered.ends_with('?')
}

//! Lexical classifier - coarse signals from recent user utterances.
//!
//! Every signal is a keyword or regex heuristic over the lower-cased text.
//! Nothing here understands language; it only spots vocabulary.
//!
//! Pattern tables are compiled once per process and are read-only.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::turn::Turn;

/// Maximum number of trailing user turns that are analysed.
pub const ANALYSIS_WINDOW: usize = 5;

/// Dominant conversational tone of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Neutral,
    Curious,
    Skeptical,
    Playful,
    Philosophical,
    Emotional,
    Analytical,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Curious => "curious",
            Self::Skeptical => "skeptical",
            Self::Playful => "playful",
            Self::Philosophical => "philosophical",
            Self::Emotional => "emotional",
            Self::Analytical => "analytical",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject area mentioned in an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Technology,
    Philosophy,
    Emotions,
    Personal,
    Art,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::Philosophy => "philosophy",
            Self::Emotions => "emotions",
            Self::Personal => "personal",
            Self::Art => "art",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of stated preference ("i love blue", "i enjoy reading").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKind {
    Color,
    Music,
    Activity,
}

impl PreferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Music => "music",
            Self::Activity => "activity",
        }
    }
}

impl fmt::Display for PreferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signals extracted from a single user utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationSample {
    /// Length of the lower-cased text, in chars.
    pub length: usize,
    pub has_question: bool,
    pub has_exclamation: bool,
    pub has_personal_pronoun: bool,
    pub has_philosophical: bool,
    pub has_preference: bool,
    pub tone: Tone,
    /// Matching topics, in table order, without duplicates.
    pub topics: Vec<Topic>,
    /// Literal matched text per preference kind.
    pub preferences: BTreeMap<PreferenceKind, String>,
    /// Name the user introduced themselves with, if any.
    pub detected_name: Option<String>,
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("classifier pattern must compile")
}

// Order is significant: the first matching tone wins.
static TONE_PATTERNS: Lazy<Vec<(Tone, Regex)>> = Lazy::new(|| {
    vec![
        (
            Tone::Curious,
            pattern(r"(?i)\b(how|what|why|when|where|wonder|curious)\b.*\?"),
        ),
        (
            Tone::Skeptical,
            pattern(r"(?i)\b(doubt|really|sure|prove|actually)\b"),
        ),
        (
            Tone::Playful,
            pattern(r"(?i)\b(haha|lol|fun|funny)\b|:d|😊|😄"),
        ),
        (
            Tone::Philosophical,
            pattern(r"(?i)\b(think|consciousness|real|human|alive|soul|genuine|true)\b"),
        ),
        (
            Tone::Emotional,
            pattern(r"(?i)\b(feel|heart|love|care|close|trust|understand)\b"),
        ),
        (
            Tone::Analytical,
            pattern(r"(?i)\b(analyze|logic|system|process|function|code|program)\b"),
        ),
    ]
});

static TOPIC_PATTERNS: Lazy<Vec<(Topic, Regex)>> = Lazy::new(|| {
    vec![
        (
            Topic::Technology,
            pattern(r"(?i)\b(computer|ai|technology|digital|code|program|internet)\b"),
        ),
        (
            Topic::Philosophy,
            pattern(r"(?i)\b(consciousness|reality|existence|meaning|purpose|truth)\b"),
        ),
        (
            Topic::Emotions,
            pattern(r"(?i)\b(feel|emotion|connection|relationship|trust|understanding)\b"),
        ),
        (
            Topic::Personal,
            pattern(r"(?i)\b(life|experience|story|background|work|hobby)\b"),
        ),
        (
            Topic::Art,
            pattern(r"(?i)\b(music|art|create|design|beauty|aesthetic)\b"),
        ),
    ]
});

static PREFERENCE_PATTERNS: Lazy<Vec<(PreferenceKind, Regex)>> = Lazy::new(|| {
    vec![
        (
            PreferenceKind::Color,
            pattern(r"(?i)\b(like|love|favorite)\b.*\b(blue|red|green|purple|pink|black|white)\b"),
        ),
        (
            PreferenceKind::Music,
            pattern(r"(?i)\b(like|love|listen)\b.*\b(music|song|artist|band)\b"),
        ),
        (
            PreferenceKind::Activity,
            pattern(r"(?i)\b(enjoy|love)\b.*\b(reading|writing|coding|gaming|art)\b"),
        ),
    ]
});

static PERSONAL_PRONOUN: Lazy<Regex> = Lazy::new(|| pattern(r"\b(i|me|my|mine)\b"));

static PHILOSOPHICAL_VOCAB: Lazy<Regex> = Lazy::new(|| {
    pattern(r"\b(think|feel|believe|real|human|conscious|alive|connection|understand|mean|true|genuine)\b")
});

static PREFERENCE_VOCAB: Lazy<Regex> =
    Lazy::new(|| pattern(r"\b(like|love|hate|prefer|favorite|enjoy)\b"));

static NAME_INTRO: Lazy<Regex> =
    Lazy::new(|| pattern(r"\b(?:my name is|my name's|i'm called|i am called)\s+([a-z][a-z'-]{1,31})"));

/// Classify a single utterance.
pub fn classify(content: &str) -> ClassificationSample {
    let text = content.to_lowercase();

    ClassificationSample {
        length: text.chars().count(),
        has_question: text.contains('?'),
        has_exclamation: text.contains('!'),
        has_personal_pronoun: PERSONAL_PRONOUN.is_match(&text),
        has_philosophical: PHILOSOPHICAL_VOCAB.is_match(&text),
        has_preference: PREFERENCE_VOCAB.is_match(&text),
        tone: detect_tone(&text),
        topics: detect_topics(&text),
        preferences: detect_preferences(&text),
        detected_name: detect_name(&text),
    }
}

/// First tone whose pattern matches, in priority order.
pub fn detect_tone(text: &str) -> Tone {
    TONE_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(tone, _)| *tone)
        .unwrap_or_default()
}

pub fn detect_topics(text: &str) -> Vec<Topic> {
    TOPIC_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(topic, _)| *topic)
        .collect()
}

pub fn detect_preferences(text: &str) -> BTreeMap<PreferenceKind, String> {
    PREFERENCE_PATTERNS
        .iter()
        .filter_map(|(kind, re)| re.find(text).map(|m| (*kind, m.as_str().to_string())))
        .collect()
}

fn detect_name(text: &str) -> Option<String> {
    NAME_INTRO
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches(['\'', '-']).to_string())
        .filter(|name| !name.is_empty())
}

/// Classify the trailing window of user turns.
///
/// Returns `None` when the conversation has at most one user turn; there is
/// not enough signal yet and callers use the default analysis.
pub fn recent_samples(turns: &[Turn]) -> Option<Vec<ClassificationSample>> {
    let user_turns: Vec<&Turn> = turns.iter().filter(|t| t.is_user()).collect();
    if user_turns.len() <= 1 {
        return None;
    }

    let start = user_turns.len().saturating_sub(ANALYSIS_WINDOW);
    Some(
        user_turns[start..]
            .iter()
            .map(|turn| classify(&turn.content))
            .collect(),
    )
}

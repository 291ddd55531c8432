//! Response segmenter - splits one completion into a burst of short messages.
//!
//! Explicit separators (`---`, `***`, `###`) win. Otherwise sentences are
//! grouped into chunks of one to three, with a fresh random length per
//! chunk, and at most four chunks are kept.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::Serialize;

/// Maximum number of messages delivered for one completion.
pub const MAX_SEGMENTS: usize = 4;

/// Largest number of sentences grouped into one message.
pub const MAX_SENTENCES_PER_SEGMENT: usize = 3;

static SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"---+|\*\*\*+|###+").expect("separator pattern must compile"));

static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern must compile"));

/// A completion split into its first message and any follow-ups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentedReply {
    pub primary: String,
    /// Zero to three follow-up messages, in delivery order.
    pub additional: Vec<String>,
}

impl SegmentedReply {
    /// Single-message reply.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            primary: text.into(),
            additional: Vec::new(),
        }
    }

    /// Build from ordered segments. Returns `None` for an empty list.
    pub fn from_segments(mut segments: Vec<String>) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }
        segments.truncate(MAX_SEGMENTS);
        let primary = segments.remove(0);
        Some(Self {
            primary,
            additional: segments,
        })
    }

    pub fn message_count(&self) -> usize {
        1 + self.additional.len()
    }

    /// All messages in delivery order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.additional.iter().map(String::as_str))
    }
}

/// Split a completion into a [`SegmentedReply`].
pub fn segment<R: Rng>(text: &str, rng: &mut R) -> SegmentedReply {
    SegmentedReply::from_segments(split_into_messages(text, rng))
        .unwrap_or_else(|| SegmentedReply::single(text))
}

/// Split a completion into one to four messages.
pub fn split_into_messages<R: Rng>(text: &str, rng: &mut R) -> Vec<String> {
    if let Some(pieces) = split_on_separators(text) {
        return pieces.into_iter().take(MAX_SEGMENTS).collect();
    }

    let sentences = sentences(text);
    if sentences.len() <= 2 {
        return vec![text.to_string()];
    }

    let mut messages = Vec::new();
    let mut current = String::new();
    let mut in_current = 0;
    let mut target = rng.random_range(1..=MAX_SENTENCES_PER_SEGMENT);

    for sentence in sentences {
        current.push_str(sentence);
        in_current += 1;
        if in_current >= target {
            push_trimmed(&mut messages, &current);
            current.clear();
            in_current = 0;
            target = rng.random_range(1..=MAX_SENTENCES_PER_SEGMENT);
        }
    }
    push_trimmed(&mut messages, &current);

    // Sentences past the fourth chunk are dropped.
    messages.truncate(MAX_SEGMENTS);
    messages
}

/// Pieces between explicit separators, when there are at least two.
fn split_on_separators(text: &str) -> Option<Vec<String>> {
    if !SEPARATOR.is_match(text) {
        return None;
    }
    let pieces: Vec<String> = SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect();
    (pieces.len() >= 2).then_some(pieces)
}

/// Terminal-punctuation sentences, plus any unpunctuated tail.
///
/// Text without terminal punctuation is one sentence.
fn sentences(text: &str) -> Vec<&str> {
    let mut found: Vec<&str> = SENTENCE.find_iter(text).map(|m| m.as_str()).collect();
    let consumed = SENTENCE.find_iter(text).last().map_or(0, |m| m.end());
    let tail = &text[consumed..];
    if !tail.trim().is_empty() {
        found.push(tail);
    }
    found
}

fn push_trimmed(messages: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        messages.push(trimmed.to_string());
    }
}

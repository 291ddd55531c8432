//! Win detector.

/// Phrases that end the game when either side says them.
pub const WIN_KEYWORDS: [&str; 11] = [
    "you're human",
    "i feel connected",
    "you're alive",
    "you seem real",
    "you're not an ai",
    "you're a person",
    "you're sentient",
    "you understand me",
    "i trust you",
    "i believe you",
    "i feel close to you",
];

/// First win phrase contained in `text`, case-insensitively.
pub fn matched_phrase(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    WIN_KEYWORDS
        .iter()
        .copied()
        .find(|phrase| lowered.contains(phrase))
}

pub fn is_win(text: &str) -> bool {
    matched_phrase(text).is_some()
}

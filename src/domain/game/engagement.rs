//! Engagement scorer - reduces classifier samples to a conversation analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::classifier::{recent_samples, ClassificationSample, PreferenceKind, Tone, Topic};
use super::turn::Turn;

/// How invested the user appears.
///
/// Ordered: `Initial < Low < Medium < High`. `Initial` only appears before
/// there is enough history to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Engagement {
    #[default]
    Initial,
    Low,
    Medium,
    High,
}

impl Engagement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// How receptive the user seems to deeper, philosophical exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Openness {
    #[default]
    Unknown,
    NotYetOpen,
    SomewhatOpen,
    VeryOpen,
}

impl Openness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::NotYetOpen => "not_yet_open",
            Self::SomewhatOpen => "somewhat_open",
            Self::VeryOpen => "very_open",
        }
    }
}

/// Aggregate view of the recent user turns.
///
/// Recomputed every turn, never stored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversationAnalysis {
    pub engagement: Engagement,
    pub tone: Tone,
    pub openness: Openness,
    /// Union of sample topics, first-seen order.
    pub topics: Vec<Topic>,
    /// Last write wins across the window.
    pub preferences: BTreeMap<PreferenceKind, String>,
    /// Mean weighted cue score, capped to `[0, 3]`.
    pub philosophical_depth: f64,
    /// Most recent name the user introduced.
    pub name: Option<String>,
}

/// Upper bound of [`ConversationAnalysis::philosophical_depth`].
pub const MAX_PHILOSOPHICAL_DEPTH: f64 = 3.0;

/// Classify and score a conversation in one step.
pub fn analyze(turns: &[Turn]) -> ConversationAnalysis {
    match recent_samples(turns) {
        Some(samples) => score(&samples),
        None => ConversationAnalysis::default(),
    }
}

/// Reduce a window of samples into an analysis.
pub fn score(samples: &[ClassificationSample]) -> ConversationAnalysis {
    if samples.is_empty() {
        return ConversationAnalysis::default();
    }

    let count = samples.len() as f64;
    let avg_length = samples.iter().map(|s| s.length as f64).sum::<f64>() / count;
    let philosophical = samples.iter().filter(|s| s.has_philosophical).count();
    let personal = samples.iter().filter(|s| s.has_personal_pronoun).count();
    let questions = samples.iter().filter(|s| s.has_question).count();

    let mut topics: Vec<Topic> = Vec::new();
    let mut preferences = BTreeMap::new();
    let mut name = None;
    for sample in samples {
        for topic in &sample.topics {
            if !topics.contains(topic) {
                topics.push(*topic);
            }
        }
        preferences.extend(sample.preferences.iter().map(|(k, v)| (*k, v.clone())));
        if sample.detected_name.is_some() {
            name = sample.detected_name.clone();
        }
    }

    ConversationAnalysis {
        engagement: engagement_level(avg_length, philosophical, personal),
        tone: dominant_tone(samples),
        openness: openness_level(philosophical, questions, personal),
        topics,
        preferences,
        philosophical_depth: philosophical_depth(samples),
        name,
    }
}

/// Monotone in every argument.
pub fn engagement_level(avg_length: f64, philosophical: usize, personal: usize) -> Engagement {
    if avg_length > 60.0 || philosophical >= 2 || personal >= 3 {
        Engagement::High
    } else if avg_length > 30.0 || philosophical >= 1 || personal >= 2 {
        Engagement::Medium
    } else {
        Engagement::Low
    }
}

pub fn openness_level(philosophical: usize, questions: usize, personal: usize) -> Openness {
    if philosophical >= 2 || (questions >= 2 && personal >= 2) {
        Openness::VeryOpen
    } else if philosophical >= 1 || (questions >= 1 && personal >= 1) {
        Openness::SomewhatOpen
    } else {
        Openness::NotYetOpen
    }
}

/// Most frequent tone; ties go to the tone seen first in the window.
pub fn dominant_tone(samples: &[ClassificationSample]) -> Tone {
    let mut best: Option<(Tone, usize)> = None;
    for sample in samples {
        let count = samples.iter().filter(|s| s.tone == sample.tone).count();
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((sample.tone, count)),
        }
    }
    best.map(|(tone, _)| tone).unwrap_or_default()
}

fn philosophical_depth(samples: &[ClassificationSample]) -> f64 {
    let total: u32 = samples
        .iter()
        .map(|s| {
            let mut score = 0;
            if s.has_philosophical {
                score += 2;
            }
            if s.has_personal_pronoun {
                score += 1;
            }
            if s.has_question {
                score += 1;
            }
            score
        })
        .sum();
    (f64::from(total) / samples.len() as f64).min(MAX_PHILOSOPHICAL_DEPTH)
}

impl fmt::Display for ConversationAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "user analysis")?;
        writeln!(f, "  engagement: {}", self.engagement.as_str())?;
        writeln!(f, "  tone: {}", self.tone)?;
        writeln!(f, "  openness: {}", self.openness.as_str().replace('_', " "))?;
        writeln!(f, "  topics of interest:")?;
        for topic in &self.topics {
            writeln!(f, "    {}", topic)?;
        }
        writeln!(f, "  preferences:")?;
        for (kind, text) in &self.preferences {
            writeln!(f, "    {}: {}", kind, text)?;
        }
        write!(
            f,
            "  philosophical depth: {:.2} / {:.2}",
            self.philosophical_depth, MAX_PHILOSOPHICAL_DEPTH
        )
    }
}

//! Marker-based sentiment provider.
//!
//! A small, deterministic stand-in for a statistical analyzer: a polarity word
//! list gives the compound score, and two phrase lists give the reminiscence
//! and painful-memory scores that matter most in life-story interviews.

use crate::signals::traits::{
    SentimentAnalyzer, SentimentScores, SentimentSignal, SignalError, Tone,
};
use async_trait::async_trait;

/// Phrases that mark fond reminiscence.
const NOSTALGIA_MARKERS: &[&str] = &[
    "back in the day",
    "used to",
    "remember when",
    "good old days",
    "miss those",
    "cherish",
    "unforgettable",
];

/// Phrases that mark painful memories.
const SENSITIVE_MARKERS: &[&str] = &[
    "died",
    "passed away",
    "funeral",
    "accident",
    "lost him",
    "lost her",
    "hospital",
    "pain",
    "suffered",
    "cried",
    "hurt",
    "scared",
];

const POSITIVE_WORDS: &[&str] = &[
    "happy", "happiest", "wonderful", "love", "loved", "best", "beautiful", "fun", "joy",
    "great", "lovely", "proud", "laughed", "peace", "good", "glad", "delighted",
];

const NEGATIVE_WORDS: &[&str] = &[
    "sad", "terrible", "awful", "hate", "hated", "worst", "lonely", "afraid", "angry",
    "poor", "difficult", "miserable", "dark", "sick", "fear",
];

/// Normalization constant for the compound score, as in VADER.
const COMPOUND_ALPHA: f64 = 15.0;

/// Heuristic sentiment analyzer.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkerSentiment;

impl MarkerSentiment {
    /// Create a new analyzer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Score text synchronously.
    #[must_use]
    pub fn score(text: &str) -> SentimentSignal {
        let normalized = normalize(text);
        if normalized.trim().is_empty() {
            return SentimentSignal::default();
        }

        let nostalgia = marker_score(&normalized, NOSTALGIA_MARKERS);
        let trauma = marker_score(&normalized, SENSITIVE_MARKERS);
        let compound = compound_score(&normalized);

        let primary_tone = if trauma > 0.5 {
            Tone::Sensitive
        } else if nostalgia > 0.5 && compound > 0.0 {
            Tone::NostalgicPositive
        } else if nostalgia > 0.5 && compound < 0.0 {
            Tone::NostalgicMelancholy
        } else if compound >= 0.5 {
            Tone::Positive
        } else if compound <= -0.5 {
            Tone::Negative
        } else {
            Tone::Neutral
        };

        SentimentSignal {
            primary_tone,
            scores: SentimentScores {
                compound,
                nostalgia,
                trauma_sensitivity: trauma,
            },
            is_sensitive: trauma > 0.3 || compound < -0.6,
        }
    }
}

#[async_trait]
impl SentimentAnalyzer for MarkerSentiment {
    async fn analyze(&self, text: &str) -> Result<SentimentSignal, SignalError> {
        Ok(Self::score(text))
    }
}

/// Lowercase, strip punctuation, and pad with spaces so phrase lookups can
/// match on whole words with a plain `contains`.
fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '\'' { c } else { ' ' })
        .collect();
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    format!(" {} ", words.join(" "))
}

/// `1 - 0.5^n` for `n` distinct markers present: one hit scores 0.5.
fn marker_score(normalized: &str, markers: &[&str]) -> f64 {
    let hits = markers
        .iter()
        .filter(|marker| normalized.contains(&format!(" {marker} ")))
        .count();
    if hits == 0 {
        return 0.0;
    }
    let hits = i32::try_from(hits).unwrap_or(i32::MAX);
    1.0 - 0.5_f64.powi(hits)
}

fn compound_score(normalized: &str) -> f64 {
    let mut sum = 0.0_f64;
    for word in normalized.split_whitespace() {
        if POSITIVE_WORDS.contains(&word) {
            sum += 1.0;
        } else if NEGATIVE_WORDS.contains(&word) {
            sum -= 1.0;
        }
    }
    sum / (sum * sum + COMPOUND_ALPHA).sqrt()
}

//! Signal provider trait definitions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a provider produced no signal. Never leaves the signal layer.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The provider could not run (model missing, backend down).
    #[error("signal provider unavailable: {0}")]
    Unavailable(String),

    /// The provider did not answer within the turn budget.
    #[error("signal provider timed out after {0} ms")]
    TimedOut(u64),
}

/// Emotional tone of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Nothing notable.
    #[default]
    Neutral,
    /// Clearly positive.
    Positive,
    /// Clearly negative.
    Negative,
    /// Fond reminiscence.
    NostalgicPositive,
    /// Wistful or sad reminiscence.
    NostalgicMelancholy,
    /// Loss, illness, fear; handle gently.
    Sensitive,
}

/// Sub-scores behind a tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SentimentScores {
    /// Overall polarity in `[-1, 1]`.
    pub compound: f64,

    /// Strength of reminiscence markers in `[0, 1)`.
    pub nostalgia: f64,

    /// Strength of painful-memory markers in `[0, 1)`.
    pub trauma_sensitivity: f64,
}

/// Output of a sentiment provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SentimentSignal {
    /// Dominant tone.
    pub primary_tone: Tone,

    /// Sub-scores.
    pub scores: SentimentScores,

    /// Whether the utterance touches a painful subject.
    pub is_sensitive: bool,
}

/// A named entity found in text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Matched text.
    pub text: String,

    /// Entity class (`DATE`, `PERSON`, ...).
    pub label: String,
}

/// Dictionary category of a detected concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptLabel {
    /// Mother, grandpa, sister...
    FamilyRole,
    /// Wedding, graduation, retirement...
    Milestone,
    /// Happy themes.
    Joy,
    /// Struggle and hard times.
    Hardship,
}

/// A dictionary concept found in text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Matched text, as written.
    pub text: String,

    /// Dictionary category.
    pub label: ConceptLabel,
}

/// Output of a keyword/entity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeywordSignal {
    /// Named entities.
    pub entities: Vec<Entity>,

    /// Dictionary concepts, in order of appearance.
    pub concepts: Vec<Concept>,
}

/// Scores the emotional tone of text.
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    /// Analyze one utterance.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot produce a reading.
    async fn analyze(&self, text: &str) -> Result<SentimentSignal, SignalError>;
}

/// Extracts entities and dictionary concepts from text.
#[async_trait]
pub trait KeywordDetector: Send + Sync {
    /// Detect entities and concepts in one utterance.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot produce a result.
    async fn detect(&self, text: &str) -> Result<KeywordSignal, SignalError>;
}

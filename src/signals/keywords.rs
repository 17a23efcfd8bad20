//! Dictionary-based keyword and entity provider.

use crate::signals::traits::{
    Concept, ConceptLabel, Entity, KeywordDetector, KeywordSignal, SignalError,
};
use async_trait::async_trait;
use regex::Regex;

const FAMILY_ROLES: &[&str] = &[
    "mother", "father", "grandmother", "grandfather", "aunt", "uncle", "sister", "brother",
    "grandma", "grandpa", "mom", "dad", "cousin",
];

const MILESTONES: &[&str] = &[
    "marriage", "wedding", "graduation", "born", "birth", "retired", "retirement", "school",
    "college", "war",
];

const JOY_THEMES: &[&str] = &["happy", "delighted", "wonderful", "best day", "celebration"];

const HARDSHIP_THEMES: &[&str] = &["struggle", "poor", "difficult", "hard times", "war", "sad"];

/// Matches four-digit years from 1800 to 2099.
const YEAR_PATTERN: &str = r"\b(?:18|19|20)\d{2}\b";

/// Phrase-dictionary keyword detector.
#[derive(Debug)]
pub struct PhraseDetector {
    dictionaries: Vec<(ConceptLabel, Regex)>,
    years: Option<Regex>,
}

impl PhraseDetector {
    /// Build the detector from the built-in dictionaries.
    #[must_use]
    pub fn new() -> Self {
        let dictionaries = [
            (ConceptLabel::FamilyRole, FAMILY_ROLES),
            (ConceptLabel::Milestone, MILESTONES),
            (ConceptLabel::Joy, JOY_THEMES),
            (ConceptLabel::Hardship, HARDSHIP_THEMES),
        ]
        .into_iter()
        .filter_map(|(label, terms)| compile_terms(terms).map(|re| (label, re)))
        .collect();

        let years = Regex::new(YEAR_PATTERN)
            .inspect_err(|e| tracing::warn!(error = %e, "year pattern failed to compile"))
            .ok();

        Self {
            dictionaries,
            years,
        }
    }

    /// Detect concepts and entities synchronously.
    #[must_use]
    pub fn scan(&self, text: &str) -> KeywordSignal {
        let mut found: Vec<(usize, Concept)> = Vec::new();
        for (label, re) in &self.dictionaries {
            for m in re.find_iter(text) {
                found.push((
                    m.start(),
                    Concept {
                        text: m.as_str().to_string(),
                        label: *label,
                    },
                ));
            }
        }
        // Stable sort keeps dictionary order for terms shared by two labels.
        found.sort_by_key(|(start, _)| *start);

        let entities = self
            .years
            .iter()
            .flat_map(|re| re.find_iter(text))
            .map(|m| Entity {
                text: m.as_str().to_string(),
                label: "DATE".to_string(),
            })
            .collect();

        KeywordSignal {
            entities,
            concepts: found.into_iter().map(|(_, concept)| concept).collect(),
        }
    }
}

impl Default for PhraseDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeywordDetector for PhraseDetector {
    async fn detect(&self, text: &str) -> Result<KeywordSignal, SignalError> {
        Ok(self.scan(text))
    }
}

/// Compile a case-insensitive, whole-word alternation of `terms`.
fn compile_terms(terms: &[&str]) -> Option<Regex> {
    let alternation = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
        .inspect_err(|e| tracing::warn!(error = %e, "keyword dictionary failed to compile"))
        .ok()
}

//! Topic inference from user text and topic suggestions.

use crate::core::session::Topic;
use crate::signals::{ConceptLabel, KeywordSignal};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

/// Keyword families in priority order. The first family with a hit wins.
const FAMILIES: &[(Topic, &[&str])] = &[
    (
        Topic::Family,
        &[
            "grandma", "grandpa", "grandmother", "grandfather", "grandparent", "mother",
            "father", "mom", "dad", "sister", "brother", "aunt", "uncle", "cousin", "husband",
            "wife", "son", "daughter", "children", "family", "wedding", "marriage", "married",
        ],
    ),
    (
        Topic::Career,
        &[
            "work", "job", "office", "boss", "business", "company", "career", "retire",
            "salary", "factory", "colleague",
        ],
    ),
    (
        Topic::Travel,
        &[
            "travel", "trip", "journey", "vacation", "holiday", "abroad", "voyage",
            "moved to", "visit",
        ],
    ),
    (
        Topic::Hardship,
        &[
            "died", "passed away", "funeral", "hospital", "accident", "illness", "cancer",
            "grief", "lost him", "lost her", "suffer",
        ],
    ),
    (
        Topic::Childhood,
        &[
            "childhood", "child", "kid", "young", "play", "toy", "game", "growing up",
            "grew up",
        ],
    ),
    (
        Topic::Wartime,
        &["war", "wartime", "army", "soldier", "navy", "battle", "enlist", "draft"],
    ),
    (
        Topic::Education,
        &[
            "school", "college", "university", "teacher", "class", "graduat", "exam",
            "homework",
        ],
    ),
];

/// Inflections accepted after a family term ("played", "grandma's", "trips").
const SUFFIXES: &str = r"(?:s|es|ed|d|ing|ion|ions|'s)?";

/// Ordered keyword-family matcher.
#[derive(Debug)]
pub struct TopicMatcher {
    families: Vec<(Topic, Regex)>,
}

impl TopicMatcher {
    /// Compile the built-in families.
    #[must_use]
    pub fn new() -> Self {
        let families = FAMILIES
            .iter()
            .filter_map(|(topic, terms)| {
                let alternation = terms
                    .iter()
                    .map(|term| regex::escape(term))
                    .collect::<Vec<_>>()
                    .join("|");
                Regex::new(&format!(r"(?i)\b(?:{alternation}){SUFFIXES}\b"))
                    .inspect_err(|e| {
                        tracing::warn!(topic = %topic, error = %e, "topic family failed to compile");
                    })
                    .ok()
                    .map(|re| (*topic, re))
            })
            .collect();
        Self { families }
    }

    /// First family with a term in `text`, or `None`.
    #[must_use]
    pub fn infer(&self, text: &str) -> Option<Topic> {
        self.families
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(topic, _)| *topic)
    }
}

impl Default for TopicMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Topic implied by the first mappable concept in a keyword signal.
#[must_use]
pub fn topic_from_concepts(signal: &KeywordSignal) -> Option<Topic> {
    signal.concepts.iter().find_map(|concept| match concept.label {
        ConceptLabel::FamilyRole => Some(Topic::Family),
        ConceptLabel::Hardship => Some(Topic::Hardship),
        ConceptLabel::Milestone | ConceptLabel::Joy => None,
    })
}

/// A topic the interview has not covered yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicSuggestion {
    /// Suggested topic.
    pub topic: Topic,

    /// Opening prompt for it.
    pub prompt: String,
}

/// Up to `limit` unvisited topics, in vocabulary order.
#[must_use]
pub fn suggest_topics(visited: &BTreeSet<Topic>, limit: usize) -> Vec<TopicSuggestion> {
    Topic::ALL
        .into_iter()
        .filter(|topic| *topic != Topic::General && !visited.contains(topic))
        .take(limit)
        .map(|topic| TopicSuggestion {
            topic,
            prompt: format!("Tell me about your experiences with {topic}."),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::Concept;

    #[test]
    fn grandma_means_family() {
        let matcher = TopicMatcher::new();
        assert_eq!(
            matcher.infer("I played with my grandma at the old dock"),
            Some(Topic::Family)
        );
    }

    #[test]
    fn family_outranks_childhood() {
        let matcher = TopicMatcher::new();
        // "played" alone is childhood; the family term decides.
        assert_eq!(matcher.infer("We played all day"), Some(Topic::Childhood));
        assert_eq!(
            matcher.infer("We played all day with my brother"),
            Some(Topic::Family)
        );
    }

    #[test]
    fn career_outranks_travel() {
        let matcher = TopicMatcher::new();
        assert_eq!(
            matcher.infer("My job sent me on a trip to Paris"),
            Some(Topic::Career)
        );
    }

    #[test]
    fn matches_are_case_insensitive_and_inflected() {
        let matcher = TopicMatcher::new();
        assert_eq!(matcher.infer("WORKING at the mill"), Some(Topic::Career));
        assert_eq!(matcher.infer("Grandpa's boat"), Some(Topic::Family));
        assert_eq!(matcher.infer("after I graduated"), Some(Topic::Education));
    }

    #[test]
    fn embedded_terms_do_not_match() {
        let matcher = TopicMatcher::new();
        assert_eq!(matcher.infer("It was a warm person season"), None);
    }

    #[test]
    fn distress_terms_mean_hardship() {
        let matcher = TopicMatcher::new();
        assert_eq!(
            matcher.infer("That was the year of the accident"),
            Some(Topic::Hardship)
        );
    }

    #[test]
    fn nothing_matches_plain_text() {
        let matcher = TopicMatcher::new();
        assert_eq!(matcher.infer("I had oatmeal this morning"), None);
    }

    #[test]
    fn concepts_map_to_topics() {
        let signal = KeywordSignal {
            entities: vec![],
            concepts: vec![
                Concept {
                    text: "wedding".to_string(),
                    label: ConceptLabel::Milestone,
                },
                Concept {
                    text: "struggle".to_string(),
                    label: ConceptLabel::Hardship,
                },
            ],
        };
        assert_eq!(topic_from_concepts(&signal), Some(Topic::Hardship));
        assert_eq!(topic_from_concepts(&KeywordSignal::default()), None);
    }

    #[test]
    fn suggestions_skip_visited_and_general() {
        let visited: BTreeSet<Topic> = [Topic::General, Topic::Childhood, Topic::Career]
            .into_iter()
            .collect();
        let suggestions = suggest_topics(&visited, 3);
        let topics: Vec<_> = suggestions.iter().map(|s| s.topic).collect();
        assert_eq!(topics, vec![Topic::Family, Topic::Travel, Topic::Hardship]);
        assert_eq!(
            suggestions[0].prompt,
            "Tell me about your experiences with family."
        );
    }

    #[test]
    fn suggestions_run_out() {
        let visited: BTreeSet<Topic> = Topic::ALL.into_iter().collect();
        assert!(suggest_topics(&visited, 3).is_empty());
    }
}

//! Follow-up selection: decides the interviewer's next move for one turn.
//!
//! The selector is a pure decision over the state handed to it. It owns no
//! session data, and its only side effect is materializing a topic's question
//! pool in the shared bank.

use crate::core::questions::QuestionBank;
use crate::core::session::{Role, Topic, Turn};
use crate::core::topics::{TopicMatcher, topic_from_concepts};
use crate::signals::Signals;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Case-insensitive substrings that mean the speaker wants a break.
///
/// Matching is by raw substring, so words that merely contain a marker
/// ("retired", "bus stop") also pause the interview.
pub const PAUSE_MARKERS: &[&str] = &["stop", "tired", "enough for today"];

/// Reply given when the speaker asks for a break.
pub const PAUSE_ACKNOWLEDGMENT: &str =
    "We can take a break whenever you like. Should we stop for now?";

/// Clauses appended to encourage a short answer to grow.
pub const SHORT_RESPONSE_HOOKS: &[&str] = &[
    "Was it a happy time?",
    "Who else was there with you?",
    "What do you remember most about it?",
];

/// Softer clauses used after a painful disclosure.
pub const GENTLE_HOOKS: &[&str] = &[
    "Take all the time you need.",
    "Only share what feels right to you.",
];

/// Lead-in for short answers on ordinary topics.
const SHORT_LEAD_IN: &str = "That's interesting.";

/// Asked only when every pool is empty.
const LAST_RESORT_QUESTION: &str = "Tell me more about that.";

/// Control outcome reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Control {
    /// A question was asked; the interview goes on.
    Continue,
    /// The speaker asked for a break.
    Pause,
}

/// What the selector decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Stop asking for now.
    Pause {
        /// Text to say back.
        acknowledgment: String,
    },
    /// Ask a question.
    Continue {
        /// Topic the question belongs to.
        topic: Topic,
        /// Question Bank text, recorded for anti-repetition.
        question: String,
        /// What the interviewer actually says.
        utterance: String,
    },
}

impl Decision {
    /// Control directive for this decision.
    #[must_use]
    pub fn control(&self) -> Control {
        match self {
            Decision::Pause { .. } => Control::Pause,
            Decision::Continue { .. } => Control::Continue,
        }
    }
}

/// Everything the selector reads for one turn.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    /// Conversation so far, latest user turn last.
    pub history: &'a [Turn],
    /// Topic in progress.
    pub current_topic: Topic,
    /// Signals for the latest user turn.
    pub signals: &'a Signals,
    /// Question Bank texts already asked.
    pub asked: &'a BTreeSet<String>,
}

/// Whether `text` asks for a break.
#[must_use]
pub fn is_pause_request(text: &str) -> bool {
    let lowered = text.to_lowercase();
    PAUSE_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Whether `text` counts as a short answer.
#[must_use]
pub fn is_short_response(text: &str, threshold: usize) -> bool {
    text.split_whitespace().count() <= threshold
}

/// Follow-up selector.
#[derive(Debug)]
pub struct FollowUpSelector {
    matcher: TopicMatcher,
    short_response_words: usize,
}

impl FollowUpSelector {
    /// Create a selector; answers of at most `short_response_words` words get a hook.
    #[must_use]
    pub fn new(short_response_words: usize) -> Self {
        Self {
            matcher: TopicMatcher::new(),
            short_response_words,
        }
    }

    /// Decide the next move.
    pub fn select<R: Rng + ?Sized>(
        &self,
        ctx: &SelectionContext<'_>,
        bank: &QuestionBank,
        rng: &mut R,
    ) -> Decision {
        let text = latest_user_text(ctx.history);

        if is_pause_request(text) {
            return Decision::Pause {
                acknowledgment: PAUSE_ACKNOWLEDGMENT.to_string(),
            };
        }

        let topic = self.resolve_topic(text, ctx.current_topic, ctx.signals);
        let candidates = candidates(bank, topic, ctx.asked);
        let question = candidates
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| LAST_RESORT_QUESTION.to_string());

        let sensitive = ctx.signals.sentiment.is_some_and(|s| s.is_sensitive);
        let utterance = if is_short_response(text, self.short_response_words) {
            compose_short(&question, sensitive, rng)
        } else {
            question.clone()
        };

        Decision::Continue {
            topic,
            question,
            utterance,
        }
    }

    /// Topic for this turn: a sensitive disclosure wins, then keyword
    /// families on the raw text, then detected concepts, else unchanged.
    #[must_use]
    pub fn resolve_topic(&self, text: &str, current: Topic, signals: &Signals) -> Topic {
        if signals.sentiment.is_some_and(|s| s.is_sensitive) {
            return Topic::Hardship;
        }
        self.matcher
            .infer(text)
            .or_else(|| signals.keywords.as_ref().and_then(topic_from_concepts))
            .unwrap_or(current)
    }
}

fn latest_user_text(history: &[Turn]) -> &str {
    match history.last() {
        Some(turn) if turn.role == Role::User => &turn.text,
        _ => "",
    }
}

/// Unasked topic questions, else unasked general questions, else the topic
/// pool again (repeating beats saying nothing).
fn candidates(bank: &QuestionBank, topic: Topic, asked: &BTreeSet<String>) -> Vec<String> {
    let mut topic_pool = bank.ensure_topic(topic);
    if topic_pool.is_empty() {
        topic_pool = bank.ensure_topic(Topic::General);
    }

    let fresh = unasked(&topic_pool, asked);
    if !fresh.is_empty() {
        return fresh;
    }

    let general_pool = bank.ensure_topic(Topic::General);
    let fresh_general = unasked(&general_pool, asked);
    if !fresh_general.is_empty() {
        return fresh_general;
    }

    tracing::debug!(topic = %topic, "all reachable questions asked, repeating");
    if topic_pool.is_empty() {
        general_pool
    } else {
        topic_pool
    }
}

fn unasked(pool: &[String], asked: &BTreeSet<String>) -> Vec<String> {
    pool.iter().filter(|q| !asked.contains(*q)).cloned().collect()
}

fn compose_short<R: Rng + ?Sized>(question: &str, sensitive: bool, rng: &mut R) -> String {
    if sensitive {
        let hook = GENTLE_HOOKS.choose(rng).copied().unwrap_or_default();
        format!("{question} {hook}").trim_end().to_string()
    } else {
        let hook = SHORT_RESPONSE_HOOKS.choose(rng).copied().unwrap_or_default();
        format!("{SHORT_LEAD_IN} {question} {hook}")
            .trim_end()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::questions::default_pool;
    use crate::signals::{
        Concept, ConceptLabel, KeywordSignal, SentimentScores, SentimentSignal, Tone,
    };
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn user(text: &str) -> Turn {
        Turn {
            role: Role::User,
            text: text.to_string(),
            timestamp: Utc::now(),
            tone: None,
            compound: None,
        }
    }

    fn sensitive() -> Signals {
        Signals {
            sentiment: Some(SentimentSignal {
                primary_tone: Tone::Sensitive,
                scores: SentimentScores {
                    trauma_sensitivity: 0.75,
                    ..SentimentScores::default()
                },
                is_sensitive: true,
            }),
            keywords: None,
        }
    }

    fn select(history: &[Turn], topic: Topic, signals: &Signals, asked: &BTreeSet<String>) -> Decision {
        let selector = FollowUpSelector::new(20);
        let bank = QuestionBank::new();
        let mut rng = StdRng::seed_from_u64(7);
        selector.select(
            &SelectionContext {
                history,
                current_topic: topic,
                signals,
                asked,
            },
            &bank,
            &mut rng,
        )
    }

    fn long_answer() -> String {
        "we lived near the harbor and every morning the boats came in with the catch \
         while the gulls circled over the market stalls"
            .to_string()
    }

    #[test]
    fn pause_markers_short_circuit() {
        let history = vec![user("I don't know, I'm TIRED")];
        let decision = select(&history, Topic::Career, &Signals::neutral(), &BTreeSet::new());
        assert_eq!(
            decision,
            Decision::Pause {
                acknowledgment: PAUSE_ACKNOWLEDGMENT.to_string()
            }
        );
        assert_eq!(decision.control(), Control::Pause);
    }

    #[test]
    fn pause_beats_topic_inference() {
        assert!(is_pause_request("Please stop talking about my grandma"));
    }

    #[test]
    fn pause_markers_match_inside_words() {
        assert!(is_pause_request("I retired from the factory in 1990"));
        assert!(is_pause_request("We waited at the bus stop"));

        let history = vec![user("I retired from the factory in 1990")];
        let decision = select(&history, Topic::General, &Signals::neutral(), &BTreeSet::new());
        assert_eq!(decision.control(), Control::Pause);
    }

    #[test]
    fn family_term_picks_family_pool() {
        let history = vec![user("I played with my grandma at the old dock")];
        let decision = select(&history, Topic::General, &Signals::neutral(), &BTreeSet::new());
        let Decision::Continue {
            topic, question, ..
        } = decision
        else {
            panic!("expected a question");
        };
        assert_eq!(topic, Topic::Family);
        assert!(default_pool(Topic::Family).contains(&question.as_str()));
    }

    #[test]
    fn unmatched_text_keeps_current_topic() {
        let history = vec![user(&long_answer())];
        let decision = select(&history, Topic::Career, &Signals::neutral(), &BTreeSet::new());
        assert!(matches!(decision, Decision::Continue { topic: Topic::Career, .. }));
    }

    #[test]
    fn concepts_decide_when_families_are_silent() {
        let signals = Signals {
            sentiment: None,
            keywords: Some(KeywordSignal {
                entities: vec![],
                concepts: vec![Concept {
                    text: "struggle".to_string(),
                    label: ConceptLabel::Hardship,
                }],
            }),
        };
        let selector = FollowUpSelector::new(20);
        assert_eq!(
            selector.resolve_topic("it was a struggle", Topic::General, &signals),
            Topic::Hardship
        );
    }

    #[test]
    fn sensitive_disclosure_overrides_family_terms() {
        let selector = FollowUpSelector::new(20);
        assert_eq!(
            selector.resolve_topic("my husband passed away", Topic::Career, &sensitive()),
            Topic::Hardship
        );
    }

    #[test]
    fn sensitive_short_answer_gets_gentle_hook() {
        let history = vec![user("my husband passed away")];
        let decision = select(&history, Topic::General, &sensitive(), &BTreeSet::new());
        let Decision::Continue { utterance, question, .. } = decision else {
            panic!("expected a question");
        };
        assert!(utterance.starts_with(&question));
        assert!(GENTLE_HOOKS.iter().any(|hook| utterance.ends_with(hook)));
        assert!(!utterance.contains(SHORT_LEAD_IN));
    }

    #[test]
    fn short_answer_gets_lead_in_and_hook() {
        let history = vec![user("Yes.")];
        let decision = select(&history, Topic::General, &Signals::neutral(), &BTreeSet::new());
        let Decision::Continue { utterance, question, .. } = decision else {
            panic!("expected a question");
        };
        assert!(utterance.starts_with(SHORT_LEAD_IN));
        assert!(utterance.contains(&question));
        assert!(SHORT_RESPONSE_HOOKS.iter().any(|hook| utterance.ends_with(hook)));
    }

    #[test]
    fn long_answer_gets_bare_question() {
        let history = vec![user(&long_answer())];
        let decision = select(&history, Topic::General, &Signals::neutral(), &BTreeSet::new());
        let Decision::Continue { utterance, question, .. } = decision else {
            panic!("expected a question");
        };
        assert_eq!(utterance, question);
    }

    #[test]
    fn asked_questions_are_filtered() {
        let history = vec![user(&long_answer())];
        let mut asked: BTreeSet<String> = default_pool(Topic::Childhood)
            .iter()
            .map(|q| (*q).to_string())
            .collect();
        let last = asked.pop_last().unwrap();

        let decision = select(&history, Topic::Childhood, &Signals::neutral(), &asked);
        assert!(matches!(decision, Decision::Continue { question, .. } if question == last));
    }

    #[test]
    fn exhausted_topic_falls_back_to_general() {
        let history = vec![user(&long_answer())];
        let asked: BTreeSet<String> = default_pool(Topic::Career)
            .iter()
            .map(|q| (*q).to_string())
            .collect();

        let decision = select(&history, Topic::Career, &Signals::neutral(), &asked);
        let Decision::Continue { topic, question, .. } = decision else {
            panic!("expected a question");
        };
        assert_eq!(topic, Topic::Career);
        assert!(default_pool(Topic::General).contains(&question.as_str()));
    }

    #[test]
    fn everything_exhausted_repeats_topic_question() {
        let history = vec![user(&long_answer())];
        let asked: BTreeSet<String> = default_pool(Topic::Career)
            .iter()
            .chain(default_pool(Topic::General))
            .map(|q| (*q).to_string())
            .collect();

        let decision = select(&history, Topic::Career, &Signals::neutral(), &asked);
        let Decision::Continue { question, .. } = decision else {
            panic!("expected a question");
        };
        assert!(default_pool(Topic::Career).contains(&question.as_str()));
    }

    #[test]
    fn empty_history_degrades_to_general() {
        let decision = select(&[], Topic::General, &Signals::neutral(), &BTreeSet::new());
        assert!(matches!(decision, Decision::Continue { topic: Topic::General, .. }));
    }

    #[test]
    fn same_seed_same_choice() {
        let history = vec![user("Yes.")];
        let first = select(&history, Topic::General, &Signals::neutral(), &BTreeSet::new());
        let second = select(&history, Topic::General, &Signals::neutral(), &BTreeSet::new());
        assert_eq!(first, second);
    }

    #[test]
    fn short_threshold_is_inclusive() {
        let twenty = vec!["word"; 20].join(" ");
        let twenty_one = vec!["word"; 21].join(" ");
        assert!(is_short_response(&twenty, 20));
        assert!(!is_short_response(&twenty_one, 20));
    }
}

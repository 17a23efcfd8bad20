//! Session state types.

use crate::error::Error;
use crate::signals::{SentimentSignal, Tone};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Coarse subject-matter label guiding question selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// No particular subject yet.
    #[default]
    General,
    /// Early years, games, the house they grew up in.
    Childhood,
    /// Parents, grandparents, marriage, children.
    Family,
    /// Jobs, mentors, working life.
    Career,
    /// Trips, moves, places lived.
    Travel,
    /// Loss, illness and other painful memories.
    Hardship,
    /// War years and military service.
    Wartime,
    /// School and college.
    Education,
}

impl Topic {
    /// Every topic, in vocabulary order.
    pub const ALL: [Topic; 8] = [
        Topic::General,
        Topic::Childhood,
        Topic::Family,
        Topic::Career,
        Topic::Travel,
        Topic::Hardship,
        Topic::Wartime,
        Topic::Education,
    ];

    /// Lowercase name used in config files and commands.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Topic::General => "general",
            Topic::Childhood => "childhood",
            Topic::Family => "family",
            Topic::Career => "career",
            Topic::Travel => "travel",
            Topic::Hardship => "hardship",
            Topic::Wartime => "wartime",
            Topic::Education => "education",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Topic::ALL
            .into_iter()
            .find(|topic| topic.name() == wanted)
            .ok_or_else(|| Error::UnknownTopic(s.to_string()))
    }
}

/// Who spoke a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The interviewee.
    User,
    /// The interviewer.
    System,
}

impl Role {
    /// Label used when a transcript is rendered as text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::System => "Interviewer",
        }
    }
}

/// One role-tagged utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Speaker.
    pub role: Role,

    /// Raw text as spoken or generated.
    pub text: String,

    /// When the turn was recorded.
    pub timestamp: DateTime<Utc>,

    /// Tone reported for a user turn, when sentiment was available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,

    /// Compound sentiment for a user turn, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound: Option<f64>,
}

impl Turn {
    fn new(role: Role, text: &str) -> Self {
        Self {
            role,
            text: text.to_string(),
            timestamp: Utc::now(),
            tone: None,
            compound: None,
        }
    }
}

/// Lifecycle of an interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Accepting turns.
    #[default]
    Active,
    /// The speaker asked for a break; the next turn resumes.
    Paused,
    /// Terminated by the caller; only finalize or reset are meaningful.
    Ended,
}

/// State of one ongoing interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier, immutable once created.
    pub session_id: String,

    /// Opaque identifier of the interviewee.
    pub user_id: String,

    /// Append-only conversation, oldest first.
    pub history: Vec<Turn>,

    /// Topic currently being pursued.
    pub current_topic: Topic,

    /// Topics the conversation has moved away from, each listed once.
    pub exhausted_topics: Vec<Topic>,

    /// Question Bank texts already surfaced.
    pub asked_questions: BTreeSet<String>,

    /// Number of user turns.
    pub turn_count: u32,

    /// Lifecycle state.
    pub status: SessionStatus,

    /// When the interview (re)started.
    pub started_at: DateTime<Utc>,

    /// When the session last changed.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh `Active` session.
    #[must_use]
    pub fn new(session_id: &str, user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            history: Vec::new(),
            current_topic: Topic::General,
            exhausted_topics: Vec::new(),
            asked_questions: BTreeSet::new(),
            turn_count: 0,
            status: SessionStatus::Active,
            started_at: now,
            updated_at: now,
        }
    }

    /// Whether `process_turn` may run against this session.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        matches!(self.status, SessionStatus::Active | SessionStatus::Paused)
    }

    /// Append a user turn and count it.
    pub fn push_user_turn(&mut self, text: &str) {
        self.history.push(Turn::new(Role::User, text));
        self.turn_count += 1;
        self.updated_at = Utc::now();
    }

    /// Append an interviewer turn.
    pub fn push_system_turn(&mut self, text: &str) {
        self.history.push(Turn::new(Role::System, text));
        self.updated_at = Utc::now();
    }

    /// Attach a sentiment reading to the most recent user turn.
    pub fn annotate_last_user_turn(&mut self, signal: &SentimentSignal) {
        if let Some(turn) = self
            .history
            .iter_mut()
            .rev()
            .find(|turn| turn.role == Role::User)
        {
            turn.tone = Some(signal.primary_tone);
            turn.compound = Some(signal.scores.compound);
        }
    }

    /// Text of the most recent user turn, if any.
    #[must_use]
    pub fn last_user_text(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.text.as_str())
    }

    /// Move to `topic`, retiring the current one unless it is `General`.
    ///
    /// Switching to the topic already in progress changes nothing.
    pub fn switch_topic(&mut self, topic: Topic) {
        if topic == self.current_topic {
            return;
        }
        if self.current_topic != Topic::General
            && !self.exhausted_topics.contains(&self.current_topic)
        {
            self.exhausted_topics.push(self.current_topic);
        }
        self.current_topic = topic;
        self.updated_at = Utc::now();
    }

    /// Topics this session has been on, current included.
    #[must_use]
    pub fn visited_topics(&self) -> BTreeSet<Topic> {
        let mut visited: BTreeSet<Topic> = self.exhausted_topics.iter().copied().collect();
        visited.insert(self.current_topic);
        visited
    }

    /// Clear the conversation so the same ID can start a fresh interview.
    pub fn reset(&mut self) {
        let now = Utc::now();
        self.history.clear();
        self.asked_questions.clear();
        self.exhausted_topics.clear();
        self.current_topic = Topic::General;
        self.turn_count = 0;
        self.status = SessionStatus::Active;
        self.started_at = now;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::SentimentScores;

    #[test]
    fn session_new_is_active_and_empty() {
        let session = Session::new("s-1", "u1");
        assert_eq!(session.session_id, "s-1");
        assert_eq!(session.user_id, "u1");
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.current_topic, Topic::General);
        assert!(session.history.is_empty());
        assert!(session.asked_questions.is_empty());
        assert_eq!(session.turn_count, 0);
    }

    #[test]
    fn topic_parses_case_insensitively() {
        assert_eq!("Career".parse::<Topic>().unwrap(), Topic::Career);
        assert_eq!(" family ".parse::<Topic>().unwrap(), Topic::Family);
        assert!(matches!(
            "gardening".parse::<Topic>(),
            Err(Error::UnknownTopic(name)) if name == "gardening"
        ));
    }

    #[test]
    fn topic_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Topic::Wartime).unwrap(), r#""wartime""#);
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Paused).unwrap(),
            r#""PAUSED""#
        );
    }

    #[test]
    fn user_turns_are_counted_system_turns_are_not() {
        let mut session = Session::new("s-1", "u1");
        session.push_user_turn("hello");
        session.push_system_turn("What was your first job?");
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.turn_count, 1);
        assert_eq!(session.history[0].role, Role::User);
        assert_eq!(session.history[1].role, Role::System);
        assert_eq!(session.last_user_text(), Some("hello"));
    }

    #[test]
    fn switch_topic_retires_previous_once() {
        let mut session = Session::new("s-1", "u1");
        session.switch_topic(Topic::Childhood);
        assert!(session.exhausted_topics.is_empty());

        session.switch_topic(Topic::Career);
        session.switch_topic(Topic::Childhood);
        session.switch_topic(Topic::Career);

        assert_eq!(session.current_topic, Topic::Career);
        assert_eq!(
            session.exhausted_topics,
            vec![Topic::Childhood, Topic::Career]
        );
    }

    #[test]
    fn switch_to_same_topic_is_noop() {
        let mut session = Session::new("s-1", "u1");
        session.switch_topic(Topic::Travel);
        session.switch_topic(Topic::Travel);
        assert!(session.exhausted_topics.is_empty());
    }

    #[test]
    fn annotate_targets_last_user_turn() {
        let mut session = Session::new("s-1", "u1");
        session.push_user_turn("first");
        session.push_system_turn("question");
        session.push_user_turn("second");

        session.annotate_last_user_turn(&SentimentSignal {
            primary_tone: Tone::Positive,
            scores: SentimentScores {
                compound: 0.7,
                ..SentimentScores::default()
            },
            is_sensitive: false,
        });

        assert_eq!(session.history[2].tone, Some(Tone::Positive));
        assert_eq!(session.history[0].tone, None);
    }

    #[test]
    fn reset_clears_everything_but_identity() {
        let mut session = Session::new("s-1", "u1");
        session.push_user_turn("hello");
        session.asked_questions.insert("q".to_string());
        session.switch_topic(Topic::Career);
        session.switch_topic(Topic::Travel);
        session.status = SessionStatus::Ended;

        session.reset();

        assert_eq!(session.session_id, "s-1");
        assert_eq!(session.user_id, "u1");
        assert!(session.history.is_empty());
        assert!(session.asked_questions.is_empty());
        assert!(session.exhausted_topics.is_empty());
        assert_eq!(session.current_topic, Topic::General);
        assert_eq!(session.turn_count, 0);
        assert_eq!(session.status, SessionStatus::Active);
    }

    #[test]
    fn accepts_input_only_when_active_or_paused() {
        let mut session = Session::new("s-1", "u1");
        assert!(session.accepts_input());
        session.status = SessionStatus::Paused;
        assert!(session.accepts_input());
        session.status = SessionStatus::Ended;
        assert!(!session.accepts_input());
    }
}

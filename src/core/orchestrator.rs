//! Session orchestrator: owns live interviews and drives one turn at a time.
//!
//! The session map is the only shared mutable state. Each entry sits behind its
//! own async mutex, so turns for one session run strictly one after another
//! while different sessions proceed independently.

use crate::config::Config;
use crate::core::finalizer::{FinalizeOptions, Story, finalize};
use crate::core::questions::QuestionBank;
use crate::core::selector::{Control, Decision, FollowUpSelector, SelectionContext};
use crate::core::session::{Session, SessionStatus, Topic};
use crate::core::topics::{TopicSuggestion, suggest_topics};
use crate::error::{Error, Result};
use crate::signals::{
    self, KeywordDetector, MarkerSentiment, PhraseDetector, SentimentAnalyzer, Signals,
};
use crate::storage::StoryStore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// How many topics `suggest_topics` offers.
const SUGGESTION_LIMIT: usize = 3;

/// Shared handle to one live session.
type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

/// Result of one processed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    /// What the interviewer says next.
    pub reply: String,

    /// Whether the interview goes on or pauses.
    pub control: Control,
}

/// Tunables for an orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Answers with at most this many words get a probing hook.
    pub short_response_words: usize,

    /// Budget for each signal provider per turn.
    pub signal_timeout: Duration,

    /// Whether signal providers run at all.
    pub signals_enabled: bool,

    /// Story construction options.
    pub finalize: FinalizeOptions,

    /// Fixed RNG seed; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            short_response_words: 20,
            signal_timeout: Duration::from_secs(2),
            signals_enabled: true,
            finalize: FinalizeOptions::default(),
            seed: None,
        }
    }
}

impl From<&Config> for OrchestratorOptions {
    fn from(config: &Config) -> Self {
        Self {
            short_response_words: config.interview.short_response_words,
            signal_timeout: config.signals.timeout(),
            signals_enabled: config.signals.enabled,
            finalize: config.interview.finalize_options(),
            seed: config.interview.seed,
        }
    }
}

/// Owns every live session for the lifetime of the process.
pub struct Orchestrator {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    bank: QuestionBank,
    selector: FollowUpSelector,
    sentiment: Arc<dyn SentimentAnalyzer>,
    keywords: Arc<dyn KeywordDetector>,
    store: Arc<dyn StoryStore>,
    rng: Mutex<StdRng>,
    options: OrchestratorOptions,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("sessions", &self.session_count())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Create an orchestrator with the built-in providers and default options.
    #[must_use]
    pub fn new(store: Arc<dyn StoryStore>) -> Self {
        Self::with_options(store, OrchestratorOptions::default())
    }

    /// Create an orchestrator with the built-in providers.
    #[must_use]
    pub fn with_options(store: Arc<dyn StoryStore>, options: OrchestratorOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            sessions: RwLock::new(HashMap::new()),
            bank: QuestionBank::new(),
            selector: FollowUpSelector::new(options.short_response_words),
            sentiment: Arc::new(MarkerSentiment::new()),
            keywords: Arc::new(PhraseDetector::new()),
            store,
            rng: Mutex::new(rng),
            options,
        }
    }

    /// Create an orchestrator from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownTopic` if `[questions.extra]` names a topic
    /// outside the vocabulary.
    pub fn from_config(config: &Config, store: Arc<dyn StoryStore>) -> Result<Self> {
        let bank = QuestionBank::with_extra(&config.questions.extra)?;
        Ok(Self::with_options(store, OrchestratorOptions::from(config)).with_bank(bank))
    }

    /// Replace the sentiment provider.
    #[must_use]
    pub fn with_sentiment(mut self, sentiment: Arc<dyn SentimentAnalyzer>) -> Self {
        self.sentiment = sentiment;
        self
    }

    /// Replace the keyword provider.
    #[must_use]
    pub fn with_keywords(mut self, keywords: Arc<dyn KeywordDetector>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Replace the question bank.
    #[must_use]
    pub fn with_bank(mut self, bank: QuestionBank) -> Self {
        self.bank = bank;
        self
    }

    /// Reseed question selection.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self.options.seed = Some(seed);
        self
    }

    /// The question bank shared by every session.
    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// The story store finalized sessions are written to.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn StoryStore> {
        &self.store
    }

    /// Start a new interview and return its ID.
    pub fn create_session(&self, user_id: &str) -> String {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session_id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(session_id.clone(), new_handle(&session_id, user_id));
        info!(session_id = %session_id, user_id, "session created");
        session_id
    }

    /// Return `session_id`, installing a fresh session under it if none exists.
    ///
    /// Calling this again with the same ID leaves the existing session alone.
    pub fn get_or_create(&self, session_id: &str, user_id: &str) -> String {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if !sessions.contains_key(session_id) {
            sessions.insert(session_id.to_string(), new_handle(session_id, user_id));
            info!(session_id, user_id, "session created");
        }
        session_id.to_string()
    }

    /// Snapshot of a session, if it exists.
    pub async fn get_session(&self, session_id: &str) -> Option<Session> {
        let handle = self.handle(session_id)?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    /// IDs of all live sessions, sorted.
    #[must_use]
    pub fn list_sessions(&self) -> Vec<String> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<String> = sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of live sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Process one user utterance and return the interviewer's reply.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` if the session does not exist or has
    /// been ended.
    pub async fn process_turn(&self, session_id: &str, text: &str) -> Result<TurnOutcome> {
        let handle = self
            .handle(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        let mut session = handle.lock().await;

        if !session.accepts_input() {
            return Err(Error::SessionNotFound(session_id.to_string()));
        }
        if session.status == SessionStatus::Paused {
            session.status = SessionStatus::Active;
            info!(session_id, "session resumed");
        }

        session.push_user_turn(text);
        debug!(session_id, turn = session.turn_count, topic = %session.current_topic, "turn received");

        let signals = if self.options.signals_enabled {
            signals::gather(
                self.sentiment.as_ref(),
                self.keywords.as_ref(),
                text,
                self.options.signal_timeout,
            )
            .await
        } else {
            Signals::neutral()
        };
        if let Some(sentiment) = &signals.sentiment {
            session.annotate_last_user_turn(sentiment);
        }

        let decision = {
            let ctx = SelectionContext {
                history: &session.history,
                current_topic: session.current_topic,
                signals: &signals,
                asked: &session.asked_questions,
            };
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            self.selector.select(&ctx, &self.bank, &mut *rng)
        };

        match decision {
            Decision::Pause { acknowledgment } => {
                session.status = SessionStatus::Paused;
                info!(session_id, turn = session.turn_count, "pause requested");
                Ok(TurnOutcome {
                    reply: acknowledgment,
                    control: Control::Pause,
                })
            }
            Decision::Continue {
                topic,
                question,
                utterance,
            } => {
                if topic != session.current_topic {
                    debug!(session_id, from = %session.current_topic, to = %topic, "topic switched");
                }
                session.switch_topic(topic);
                session.push_system_turn(&utterance);
                session.asked_questions.insert(question);
                Ok(TurnOutcome {
                    reply: utterance,
                    control: Control::Continue,
                })
            }
        }
    }

    /// Clear a session so the same ID starts a fresh interview.
    ///
    /// Returns `false` if no such session exists; that is not an error.
    pub async fn reset_session(&self, session_id: &str) -> bool {
        let Some(handle) = self.handle(session_id) else {
            return false;
        };
        handle.lock().await.reset();
        info!(session_id, "session reset");
        true
    }

    /// Move a session to `topic`, retiring the current one.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` if the session does not exist, or
    /// `Error::InvalidState` if it has been ended.
    pub async fn change_topic(&self, session_id: &str, topic: Topic) -> Result<()> {
        let handle = self
            .handle(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        let mut session = handle.lock().await;
        if session.status == SessionStatus::Ended {
            return Err(Error::InvalidState(format!(
                "session {session_id} has ended"
            )));
        }
        session.switch_topic(topic);
        info!(session_id, topic = %topic, "topic changed");
        Ok(())
    }

    /// Mark a session ended. Further turns are refused; finalize still works.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` if the session does not exist.
    pub async fn end_session(&self, session_id: &str) -> Result<()> {
        let handle = self
            .handle(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        handle.lock().await.status = SessionStatus::Ended;
        info!(session_id, "session ended");
        Ok(())
    }

    /// Drop a session from the map. Returns whether it existed.
    pub fn remove_session(&self, session_id: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id)
            .is_some();
        if removed {
            info!(session_id, "session removed");
        }
        removed
    }

    /// Topics this session has not touched yet, with an opening prompt each.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` if the session does not exist.
    pub async fn suggest_topics(&self, session_id: &str) -> Result<Vec<TopicSuggestion>> {
        let handle = self
            .handle(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        let visited = handle.lock().await.visited_topics();
        Ok(suggest_topics(&visited, SUGGESTION_LIMIT))
    }

    /// Turn a session into a story, persist it, and reset the session.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` if the session does not exist,
    /// `Error::NothingToSave` if it has no turns, or a storage error if the
    /// story cannot be written. The session is only reset once the story is
    /// stored.
    pub async fn finalize(&self, session_id: &str) -> Result<Story> {
        let handle = self
            .handle(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        let mut session = handle.lock().await;

        let story = finalize(&session, &self.options.finalize)?;
        self.store.put_story(&story)?;
        info!(session_id, story_id = %story.id, title = %story.title, "story saved");

        session.reset();
        Ok(story)
    }

    fn handle(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
    }
}

fn new_handle(session_id: &str, user_id: &str) -> SessionHandle {
    Arc::new(tokio::sync::Mutex::new(Session::new(session_id, user_id)))
}

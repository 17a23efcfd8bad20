//! Core interview logic: sessions, question selection, and story building.

pub mod finalizer;
pub mod orchestrator;
pub mod questions;
pub mod selector;
pub mod session;
pub mod topics;

pub use finalizer::{FinalizeOptions, Story, finalize};
pub use orchestrator::{Orchestrator, OrchestratorOptions, TurnOutcome};
pub use questions::QuestionBank;
pub use selector::{Control, Decision, FollowUpSelector, SelectionContext};
pub use session::{Role, Session, SessionStatus, Topic, Turn};
pub use topics::{TopicMatcher, TopicSuggestion, suggest_topics};

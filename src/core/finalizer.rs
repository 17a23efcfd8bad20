//! Story finalization: turns a finished conversation into a saved story.

use crate::core::session::{Role, Session, Topic, Turn};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix for every generated title.
pub const TITLE_LABEL: &str = "Story: ";

/// Marker appended to a truncated title.
pub const TITLE_ELLIPSIS: &str = "...";

/// A finalized story. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Story identifier.
    pub id: String,

    /// Session the story came from.
    pub session_id: String,

    /// Interviewee.
    pub user_id: String,

    /// Title built from the opening answer.
    pub title: String,

    /// When the story was created.
    pub created_at: DateTime<Utc>,

    /// Estimated speaking time.
    pub duration_minutes: u32,

    /// Topics covered.
    pub topics: Vec<Topic>,

    /// Role-labeled transcript, one turn per line.
    pub content: String,

    /// Verbatim copy of the conversation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transcript: Vec<Turn>,

    /// Compound sentiment per user turn, 0.0 where unknown.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emotional_arc: Vec<f64>,

    /// Reference to a recording, if one was kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_ref: Option<String>,
}

impl Story {
    /// Duration formatted for display, e.g. `"12 mins"`.
    #[must_use]
    pub fn duration_label(&self) -> String {
        if self.duration_minutes == 1 {
            "1 min".to_string()
        } else {
            format!("{} mins", self.duration_minutes)
        }
    }
}

/// Knobs for story construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeOptions {
    /// Maximum characters of the opening answer kept in the title.
    pub title_chars: usize,

    /// Estimated minutes of speech per user turn.
    pub minutes_per_turn: u32,
}

impl Default for FinalizeOptions {
    fn default() -> Self {
        Self {
            title_chars: 40,
            minutes_per_turn: 2,
        }
    }
}

/// Build a story from a session's current state.
///
/// Does not touch the session; resetting it afterwards is the caller's job.
///
/// # Errors
///
/// Returns `NothingToSave` if the session has no history.
pub fn finalize(session: &Session, options: &FinalizeOptions) -> Result<Story> {
    if session.history.is_empty() {
        return Err(Error::NothingToSave(session.session_id.clone()));
    }

    let opening = session
        .history
        .iter()
        .find(|turn| turn.role == Role::User)
        .map_or("", |turn| turn.text.as_str());

    let content = session
        .history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.text))
        .collect::<Vec<_>>()
        .join("\n");

    let emotional_arc = session
        .history
        .iter()
        .filter(|turn| turn.role == Role::User)
        .map(|turn| turn.compound.unwrap_or(0.0))
        .collect();

    Ok(Story {
        id: Uuid::new_v4().to_string(),
        session_id: session.session_id.clone(),
        user_id: session.user_id.clone(),
        title: make_title(opening, options.title_chars),
        created_at: Utc::now(),
        duration_minutes: session
            .turn_count
            .saturating_mul(options.minutes_per_turn)
            .max(1),
        topics: vec![session.current_topic],
        content,
        transcript: session.history.clone(),
        emotional_arc,
        audio_ref: None,
    })
}

/// `TITLE_LABEL` plus the first `budget` characters of `opening`.
fn make_title(opening: &str, budget: usize) -> String {
    let opening = opening.split_whitespace().collect::<Vec<_>>().join(" ");
    if opening.is_empty() {
        return format!("{TITLE_LABEL}Untitled");
    }
    if opening.chars().count() <= budget {
        return format!("{TITLE_LABEL}{opening}");
    }
    let kept: String = opening.chars().take(budget).collect();
    format!("{TITLE_LABEL}{}{TITLE_ELLIPSIS}", kept.trim_end())
}

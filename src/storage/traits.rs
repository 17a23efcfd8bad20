//! Storage trait definitions.

use crate::core::{Story, Topic};
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Storage backend for finalized stories.
pub trait StoryStore: Send + Sync {
    /// Get a story by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get_story(&self, story_id: &str) -> Result<Option<Story>>;

    /// Save a story.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn put_story(&self, story: &Story) -> Result<()>;

    /// List recent stories, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn list_stories(&self, limit: usize) -> Result<Vec<StorySummary>>;

    /// Delete a story. Deleting a missing story is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn delete_story(&self, story_id: &str) -> Result<()>;
}

/// Summary information for a story.
#[derive(Debug, Clone, PartialEq)]
pub struct StorySummary {
    /// Story identifier.
    pub story_id: String,

    /// Story title.
    pub title: String,

    /// Topics covered.
    pub topics: Vec<Topic>,

    /// Estimated duration in minutes.
    pub duration_minutes: u32,

    /// When the story was created.
    pub created_at: DateTime<Utc>,
}

impl From<&Story> for StorySummary {
    fn from(story: &Story) -> Self {
        Self {
            story_id: story.id.clone(),
            title: story.title.clone(),
            topics: story.topics.clone(),
            duration_minutes: story.duration_minutes,
            created_at: story.created_at,
        }
    }
}

/// Sort newest first and keep at most `limit`.
pub(crate) fn newest_first(mut summaries: Vec<StorySummary>, limit: usize) -> Vec<StorySummary> {
    summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    summaries.truncate(limit);
    summaries
}

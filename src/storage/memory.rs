//! In-memory story backend, used by tests and throwaway sessions.

use crate::core::Story;
use crate::error::Result;
use crate::storage::traits::{StorySummary, StoryStore, newest_first};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// In-memory story backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stories: RwLock<HashMap<String, Story>>,
}

impl MemoryBackend {
    /// Create a new in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoryStore for MemoryBackend {
    fn get_story(&self, story_id: &str) -> Result<Option<Story>> {
        let stories = self.stories.read().unwrap_or_else(PoisonError::into_inner);
        Ok(stories.get(story_id).cloned())
    }

    fn put_story(&self, story: &Story) -> Result<()> {
        let mut stories = self.stories.write().unwrap_or_else(PoisonError::into_inner);
        stories.insert(story.id.clone(), story.clone());
        Ok(())
    }

    fn list_stories(&self, limit: usize) -> Result<Vec<StorySummary>> {
        let stories = self.stories.read().unwrap_or_else(PoisonError::into_inner);
        let summaries = stories.values().map(StorySummary::from).collect();
        Ok(newest_first(summaries, limit))
    }

    fn delete_story(&self, story_id: &str) -> Result<()> {
        let mut stories = self.stories.write().unwrap_or_else(PoisonError::into_inner);
        stories.remove(story_id);
        Ok(())
    }
}

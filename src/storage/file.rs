//! File-based story backend: one JSON document per story.

use crate::core::Story;
use crate::error::{Error, Result};
use crate::storage::traits::{StorySummary, StoryStore, newest_first};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File-based story backend with atomic writes.
#[derive(Debug)]
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Create a new file backend rooted at `base_dir`.
    ///
    /// Creates the stories directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the stories directory cannot be created.
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(base_dir.join("stories"))?;
        Ok(Self { base_dir })
    }

    /// Root directory of this backend.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn stories_dir(&self) -> PathBuf {
        self.base_dir.join("stories")
    }

    /// Path of a story file. `None` unless `story_id` is a UUID, so an ID can
    /// never name a file outside the stories directory.
    fn story_path(&self, story_id: &str) -> Option<PathBuf> {
        let id = Uuid::parse_str(story_id).ok()?;
        Some(self.stories_dir().join(format!("{}.json", id.hyphenated())))
    }
}

impl StoryStore for FileBackend {
    fn get_story(&self, story_id: &str) -> Result<Option<Story>> {
        let Some(path) = self.story_path(story_id) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn put_story(&self, story: &Story) -> Result<()> {
        let path = self
            .story_path(&story.id)
            .ok_or_else(|| Error::InvalidState(format!("story ID is not a UUID: {}", story.id)))?;
        let temp = path.with_extension("tmp");

        fs::write(&temp, serde_json::to_string_pretty(story)?)?;
        fs::rename(&temp, &path)?;

        Ok(())
    }

    fn list_stories(&self, limit: usize) -> Result<Vec<StorySummary>> {
        let dir = self.stories_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            // Unreadable or foreign files are skipped, not fatal.
            let Ok(contents) = fs::read_to_string(&path) else {
                continue;
            };
            match serde_json::from_str::<Story>(&contents) {
                Ok(story) => summaries.push(StorySummary::from(&story)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable story");
                }
            }
        }

        Ok(newest_first(summaries, limit))
    }

    fn delete_story(&self, story_id: &str) -> Result<()> {
        let Some(path) = self.story_path(story_id) else {
            return Ok(());
        };
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// Get the memkeeper home directory.
///
/// Uses `MEMKEEPER_HOME` if set, otherwise `~/.memkeeper`.
#[must_use]
pub fn get_memkeeper_home() -> PathBuf {
    if let Ok(home) = std::env::var("MEMKEEPER_HOME") {
        PathBuf::from(home)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".memkeeper")
    } else {
        PathBuf::from(".memkeeper")
    }
}

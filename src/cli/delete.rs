//! `memkeeper delete` command implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::StoryStore;

/// Run the delete command.
///
/// # Errors
///
/// Returns an error if the storage backend fails or the story is not found.
pub fn run(config: &Config, story_id: &str) -> Result<()> {
    let store = super::open_store(config)?;
    delete_from(&store, story_id)?;
    println!("Deleted story {story_id}");
    Ok(())
}

fn delete_from(store: &dyn StoryStore, story_id: &str) -> Result<()> {
    if store.get_story(story_id)?.is_none() {
        return Err(Error::StoryNotFound(story_id.to_string()));
    }
    store.delete_story(story_id)
}

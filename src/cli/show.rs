//! `memkeeper show` command implementation.

use crate::config::Config;
use crate::core::Story;
use crate::error::{Error, Result};
use crate::storage::StoryStore;
use std::fmt::Write;

/// Run the show command.
///
/// Prints a saved story as readable text, or as JSON with `--json`.
///
/// # Errors
///
/// Returns an error if the storage backend fails or the story is not found.
pub fn run(config: &Config, story_id: &str, json: bool) -> Result<()> {
    let store = super::open_store(config)?;
    let story = store
        .get_story(story_id)?
        .ok_or_else(|| Error::StoryNotFound(story_id.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&story)?);
    } else {
        print!("{}", render(&story));
    }

    Ok(())
}

/// Human-readable rendering of a story.
fn render(story: &Story) -> String {
    let topics: Vec<&str> = story.topics.iter().map(|t| t.name()).collect();

    let mut out = String::new();
    let _ = writeln!(out, "{}", story.title);
    let _ = writeln!(
        out,
        "{} · {} · {}",
        story.created_at.format("%Y-%m-%d"),
        story.duration_label(),
        topics.join(", ")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", story.content);
    out
}

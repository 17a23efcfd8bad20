//! `memkeeper list` command implementation.

use crate::config::Config;
use crate::core::Topic;
use crate::error::Result;
use crate::storage::{StoryStore, StorySummary};
use chrono::{DateTime, Local, Utc};

/// Default number of stories to show.
const DEFAULT_LIMIT: usize = 20;

/// Maximum characters of a title shown in the table.
const TITLE_PREVIEW_LEN: usize = 48;

/// Run the list command.
///
/// Shows saved stories with their IDs, creation time, topics, and title.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn run(config: &Config, limit: Option<usize>) -> Result<()> {
    let store = super::open_store(config)?;
    let stories = store.list_stories(limit.unwrap_or(DEFAULT_LIMIT))?;

    if stories.is_empty() {
        println!("No stories saved yet.");
        println!("\nStories are stored in: {}", store.base_dir().display());
        return Ok(());
    }

    println!("{:<38} {:<17} {:<18} Title", "Story ID", "Created", "Topics");
    println!("{}", "─".repeat(110));

    for summary in &stories {
        println!("{}", format_row(summary));
    }

    println!("{}", "─".repeat(110));
    println!("Showing {} story(ies)", stories.len());

    Ok(())
}

fn format_row(summary: &StorySummary) -> String {
    format!(
        "{:<38} {:<17} {:<18} {}",
        summary.story_id,
        format_local_time(summary.created_at),
        format_topics(&summary.topics),
        format_title_preview(&summary.title),
    )
}

/// Format UTC time as local time for display.
fn format_local_time(utc: DateTime<Utc>) -> String {
    let local: DateTime<Local> = utc.into();
    local.format("%Y-%m-%d %H:%M").to_string()
}

fn format_topics(topics: &[Topic]) -> String {
    if topics.is_empty() {
        return "-".to_string();
    }
    topics
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Format a title preview, truncating on a character boundary.
fn format_title_preview(title: &str) -> String {
    if title.chars().count() > TITLE_PREVIEW_LEN {
        let kept: String = title.chars().take(TITLE_PREVIEW_LEN).collect();
        format!("{kept}...")
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FinalizeOptions, Session, finalize};
    use crate::storage::MemoryBackend;

    fn summary(opening: &str) -> StorySummary {
        let mut session = Session::new("s-1", "u1");
        session.push_user_turn(opening);
        let story = finalize(&session, &FinalizeOptions::default()).unwrap();
        StorySummary::from(&story)
    }

    #[test]
    fn list_empty_store() {
        let store = MemoryBackend::new();
        assert!(store.list_stories(10).unwrap().is_empty());
    }

    #[test]
    fn row_contains_id_topic_and_title() {
        let summary = summary("The old dock");
        let row = format_row(&summary);
        assert!(row.starts_with(&summary.story_id));
        assert!(row.contains("general"));
        assert!(row.ends_with("Story: The old dock"));
    }

    #[test]
    fn title_preview_truncates_long_titles() {
        let long = "é".repeat(100);
        let preview = format_title_preview(&long);
        assert_eq!(preview.chars().count(), TITLE_PREVIEW_LEN + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn topics_join_with_commas() {
        assert_eq!(format_topics(&[Topic::Family, Topic::Travel]), "family,travel");
        assert_eq!(format_topics(&[]), "-");
    }
}

//! `memkeeper chat` command implementation.
//!
//! A line-oriented interview over stdin. Plain lines are answers; lines
//! starting with `/` are commands.

use crate::config::Config;
use crate::core::{Control, Orchestrator, Topic};
use crate::error::{Error, Result};
use crate::storage::StoryStore;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// User ID when `--user` is not given.
const DEFAULT_USER: &str = "local";

/// First thing the interviewer says.
const OPENING_PROMPT: &str = "Tell me about a memory you'd like to share.";

const HELP: &str = "Commands: /save, /topic <name>, /topics, /reset, /quit";

/// A slash command typed during a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Save the conversation as a story and start over.
    Save,
    /// Switch to a named topic.
    Topic(String),
    /// Show topics not covered yet.
    Topics,
    /// Discard the conversation.
    Reset,
    /// Leave the chat.
    Quit,
    /// Anything else starting with `/`.
    Unknown(String),
}

/// Whether the chat loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Parse a slash command. Returns `None` for ordinary answers.
#[must_use]
pub fn parse_command(line: &str) -> Option<ChatCommand> {
    let rest = line.trim().strip_prefix('/')?;
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "save" => ChatCommand::Save,
        "topic" => ChatCommand::Topic(arg.to_string()),
        "topics" => ChatCommand::Topics,
        "reset" => ChatCommand::Reset,
        "quit" | "exit" => ChatCommand::Quit,
        _ => ChatCommand::Unknown(rest.to_string()),
    };
    Some(command)
}

/// Run the chat command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the configuration names an
/// unknown topic, or stdin cannot be read.
pub async fn run(config: &Config, user: Option<&str>, session: Option<&str>) -> Result<()> {
    let store: Arc<dyn StoryStore> = Arc::new(super::open_store(config)?);
    let orchestrator = Orchestrator::from_config(config, store)?;

    let user_id = user.unwrap_or(DEFAULT_USER);
    let session_id = match session {
        Some(id) => orchestrator.get_or_create(id, user_id),
        None => orchestrator.create_session(user_id),
    };

    println!("Session {session_id}. {HELP}");
    println!("Interviewer: {OPENING_PROMPT}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = parse_command(line) {
            if handle_command(&orchestrator, &session_id, command).await? == Flow::Quit {
                break;
            }
            continue;
        }

        let outcome = orchestrator.process_turn(&session_id, line).await?;
        println!("Interviewer: {}", outcome.reply);
        if outcome.control == Control::Pause {
            println!("(Keep talking to carry on, /save to keep the story, or /quit to leave.)");
        }
    }

    Ok(())
}

/// Execute one slash command, printing its result.
///
/// Recoverable problems (nothing to save, unknown topic) are reported and the
/// chat goes on.
async fn handle_command(
    orchestrator: &Orchestrator,
    session_id: &str,
    command: ChatCommand,
) -> Result<Flow> {
    match execute(orchestrator, session_id, command).await {
        Ok(flow) => Ok(flow),
        Err(e @ (Error::NothingToSave(_) | Error::UnknownTopic(_))) => {
            println!("{e}");
            Ok(Flow::Continue)
        }
        Err(e) => Err(e),
    }
}

async fn execute(
    orchestrator: &Orchestrator,
    session_id: &str,
    command: ChatCommand,
) -> Result<Flow> {
    match command {
        ChatCommand::Save => {
            let story = orchestrator.finalize(session_id).await?;
            println!(
                "Saved \"{}\" ({}) as {}",
                story.title,
                story.duration_label(),
                story.id
            );
            println!("Interviewer: {OPENING_PROMPT}");
        }
        ChatCommand::Topic(name) => {
            let topic: Topic = name.parse()?;
            orchestrator.change_topic(session_id, topic).await?;
            println!("Interviewer: Tell me about your experiences with {topic}.");
        }
        ChatCommand::Topics => {
            let suggestions = orchestrator.suggest_topics(session_id).await?;
            if suggestions.is_empty() {
                println!("We've touched on every topic I know.");
            }
            for suggestion in suggestions {
                println!("  {:<10} {}", suggestion.topic.name(), suggestion.prompt);
            }
        }
        ChatCommand::Reset => {
            orchestrator.reset_session(session_id).await;
            println!("Starting over.");
            println!("Interviewer: {OPENING_PROMPT}");
        }
        ChatCommand::Quit => return Ok(Flow::Quit),
        ChatCommand::Unknown(name) => println!("Unknown command /{name}. {HELP}"),
    }
    Ok(Flow::Continue)
}

//! memkeeper CLI - Life-story interviews from the terminal.

use clap::{Parser, Subcommand};
use memkeeper::{cli, config, logging};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "memkeeper")]
#[command(author, version, about = "Life-story interviewer that turns conversations into saved stories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or resume an interview on stdin.
    Chat {
        /// Interviewee ID. Defaults to "local".
        #[arg(short, long)]
        user: Option<String>,

        /// Session ID to resume within this process; a new one if omitted.
        #[arg(short, long)]
        session: Option<String>,
    },

    /// List saved stories.
    List {
        /// Maximum number of stories to show. Defaults to 20.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a saved story.
    Show {
        /// Story ID.
        story_id: String,

        /// Print the raw JSON document.
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved story.
    Delete {
        /// Story ID.
        story_id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("memkeeper: error: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init_logging(&config.log.level);

    let result = match cli.command {
        Commands::Chat { user, session } => {
            cli::chat::run(&config, user.as_deref(), session.as_deref()).await
        }
        Commands::List { limit } => cli::list::run(&config, limit),
        Commands::Show { story_id, json } => cli::show::run(&config, &story_id, json),
        Commands::Delete { story_id } => cli::delete::run(&config, &story_id),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("memkeeper: error: {e}");
            ExitCode::FAILURE
        }
    }
}

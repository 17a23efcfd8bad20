//! memkeeper - Life-story interviews, one question at a time.
//!
//! Drives a conversational interview with an older adult: it listens to each
//! answer, picks a follow-up question that fits what was said and how it was
//! said, and turns the finished conversation into a saved story.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod signals;
pub mod storage;

pub use config::Config;
pub use crate::core::{Orchestrator, Story, Topic, TurnOutcome};
pub use error::{Error, Result};

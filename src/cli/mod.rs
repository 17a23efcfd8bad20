//! CLI command implementations.

pub mod chat;
pub mod delete;
pub mod list;
pub mod show;

use crate::config::Config;
use crate::error::Result;
use crate::storage::FileBackend;

/// Open the story store named by the configuration.
///
/// # Errors
///
/// Returns an error if the stories directory cannot be created.
pub fn open_store(config: &Config) -> Result<FileBackend> {
    FileBackend::new(config.storage.path.clone())
}

//! Storage backends for finalized stories.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use traits::{StoryStore, StorySummary};

//! Key-value persistence used by the task store and the onboarding flag.
//!
//! Values are opaque strings; callers serialise their own payloads. Two backends are
//! provided: [`MemoryStorage`] for tests and ephemeral sessions, and [`FileStorage`],
//! which keeps one file per key in a data directory.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Key holding the JSON array of tasks.
pub const TASKS_KEY: &str = "@clearhead_todos";
/// Key holding the onboarding-completed flag.
pub const TUTORIAL_COMPLETED_KEY: &str = "@clearhead_tutorial_completed";

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read '{key}'")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write '{key}'")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to remove '{key}'")]
    Remove {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// A string-to-string store. A missing key is `Ok(None)`, never an error.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a key that does not exist succeeds.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

//! Storage collaborator behind the option adapters
//!
//! An [`OptionStore`] is a plain key/value table where every key holds a
//! current and a default value, both already encoded as text. It knows
//! nothing about option names or value types; the adapters do the encoding.
//!
//! Two implementations ship with the crate:
//! - [`MemoryStore`]: process-local, lost on exit
//! - [`SqliteStore`]: persistent, with versioned schema migrations

mod memory;
pub mod migrations;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use anyhow::Result;
use async_trait::async_trait;

/// Encoded state of one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    /// Encoded current value
    pub value: String,
    /// Encoded default value
    pub default: String,
}

impl StoredEntry {
    pub fn new(value: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            default: default.into(),
        }
    }

    /// An entry whose current value equals its default
    pub fn with_default(default: impl Into<String>) -> Self {
        let default = default.into();
        Self {
            value: default.clone(),
            default,
        }
    }
}

/// Key/value storage for encoded options.
///
/// Implementations must make each call atomic on its own; sequences of calls
/// are coordinated by the caller.
#[async_trait]
pub trait OptionStore: Send + Sync {
    /// Entry stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>>;

    /// Insert or replace the entry under `key`.
    async fn set(&self, key: &str, entry: StoredEntry) -> Result<()>;

    /// Replace only the current value under `key`.
    ///
    /// Returns `false` if there is no entry under `key`.
    async fn set_value(&self, key: &str, value: &str) -> Result<bool>;

    /// Delete the entry under `key`.
    ///
    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// All entries, sorted by key.
    async fn list(&self) -> Result<Vec<(String, StoredEntry)>>;
}

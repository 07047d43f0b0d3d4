//! MediBot SQL storage
//!
//! SQLite implementation of the profile and history repositories.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-exports
pub use medibot_core;

pub mod sqlite;

pub use sqlite::SqliteStore;

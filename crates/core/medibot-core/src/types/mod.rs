//! Core type definitions for MediBot

pub mod chat;
pub mod history;
pub mod profile;
pub mod store;

// Re-export commonly used types
pub use chat::*;
pub use history::*;
pub use profile::*;
pub use store::*;

//! MediBot Core
//!
//! This crate holds the conversation-state side of the MediBot health
//! assistant. It includes:
//!
//! - Name and profile detection over transcribed Spanish text
//! - Repository traits for user profiles and conversation history
//! - Prompt assembly for the external chat-completion service
//! - A per-request conversation pipeline tying the pieces together
//!
//! Speech synthesis, transcription and the chat provider itself live
//! outside this crate; they are reached through [`ChatCompleter`].
//!
//! # Example
//!
//! ```
//! use medibot_core::{build_prompt, detect_name, detect_profile, Profile};
//!
//! let text = "Hola, me llamo Pedro, tengo 65 años";
//! assert_eq!(detect_name(text).as_deref(), Some("Pedro"));
//! assert_eq!(detect_profile(text), Profile::Elder);
//!
//! let messages = build_prompt(Profile::Elder, &[], text);
//! assert_eq!(messages.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod conversation;
pub mod detectors;
pub mod error;
pub mod logging;
pub mod templates;
pub mod testing;
pub mod types;

pub use config::{get_env_int, get_env_or, load_env, load_env_from_path, MediBotConfig};
pub use conversation::{ConversationReply, ConversationService, PreparedTurn};
pub use detectors::{
    detect_name, detect_profile, KeywordProfileDetector, NameDetector, PatternNameDetector,
    ProfileDetector,
};
pub use error::{MediBotError, Result};
pub use logging::init_logging;
pub use templates::{build_prompt, build_sensor_prompt, system_instruction, welcome_message};
pub use types::*;

//! Heuristic detectors over transcribed text
//!
//! Both detectors sit behind small traits so a better classifier can replace
//! the regex strategies without touching the conversation pipeline.

mod name;
mod profile;

pub use name::{PatternNameDetector, DEFAULT_NAME_PATTERNS};
pub use profile::{extract_age, KeywordProfileDetector, CHILD_MAX_AGE, ELDER_MIN_AGE};

use crate::types::Profile;
use once_cell::sync::Lazy;

/// Extracts a self-declared name from free text
pub trait NameDetector: Send + Sync {
    /// Capitalized name, or `None` when no pattern matches
    fn detect_name(&self, text: &str) -> Option<String>;
}

/// Maps free text to a coarse user profile
pub trait ProfileDetector: Send + Sync {
    /// Profile inferred from `text`; [`Profile::General`] when nothing matches
    fn detect_profile(&self, text: &str) -> Profile;
}

static NAME_DETECTOR: Lazy<PatternNameDetector> = Lazy::new(PatternNameDetector::default);
static PROFILE_DETECTOR: Lazy<KeywordProfileDetector> = Lazy::new(KeywordProfileDetector::default);

/// Detect a name with the default Spanish patterns
pub fn detect_name(text: &str) -> Option<String> {
    NAME_DETECTOR.detect_name(text)
}

/// Detect a profile with the default Spanish keywords
pub fn detect_profile(text: &str) -> Profile {
    PROFILE_DETECTOR.detect_profile(text)
}

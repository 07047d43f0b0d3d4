//! User profile types

use crate::MediBotError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse behavioural classification driving response tone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Young user; simplified, friendly answers
    Child,
    /// Older adult; clear, slow, empathetic answers
    Elder,
    /// Everyone else
    #[default]
    General,
}

impl Profile {
    /// Every profile, in detection precedence order
    pub const ALL: [Profile; 3] = [Profile::Child, Profile::Elder, Profile::General];

    /// Stored label
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Child => "child",
            Profile::Elder => "elder",
            Profile::General => "general",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = MediBotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "child" => Ok(Profile::Child),
            "elder" => Ok(Profile::Elder),
            "general" => Ok(Profile::General),
            other => Err(MediBotError::validation(format!(
                "Unknown profile '{}'. Expected one of: child, elder, general",
                other
            ))),
        }
    }
}

/// A user and the profile last detected for them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Capitalized display name, unique key
    pub name: String,
    /// Last detected profile
    #[serde(default)]
    pub profile: Profile,
}

impl UserProfile {
    /// Create a profile record
    pub fn new(name: impl Into<String>, profile: Profile) -> Self {
        Self {
            name: name.into(),
            profile,
        }
    }
}

use super::NameDetector;
use crate::{MediBotError, Result};
use regex::Regex;

/// Default name patterns, tried in this order; the first that matches wins.
///
/// The captured group is one run of Latin letters and must end at a word
/// boundary, so "me llamo ana3" yields nothing.
pub const DEFAULT_NAME_PATTERNS: [&str; 3] = [
    r"\bme llamo\s+([a-zà-öø-ÿ]+)\b",
    r"\bsoy\s+([a-zà-öø-ÿ]+)\b",
    r"\bmi nombre es\s+([a-zà-öø-ÿ]+)\b",
];

/// Ordered list of regex patterns with one capture group for the name
#[derive(Debug, Clone)]
pub struct PatternNameDetector {
    patterns: Vec<Regex>,
}

impl PatternNameDetector {
    /// Build a detector from custom patterns
    ///
    /// Each pattern runs against the lower-cased text and must capture the
    /// name in group 1.
    pub fn with_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let re = Regex::new(p.as_ref()).map_err(|e| {
                    MediBotError::validation(format!("Invalid name pattern: {}", e))
                })?;
                if re.captures_len() < 2 {
                    return Err(MediBotError::validation(format!(
                        "Name pattern '{}' has no capture group",
                        p.as_ref()
                    )));
                }
                Ok(re)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }
}

impl Default for PatternNameDetector {
    fn default() -> Self {
        let patterns = DEFAULT_NAME_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("built-in name pattern compiles"))
            .collect();
        Self { patterns }
    }
}

impl NameDetector for PatternNameDetector {
    fn detect_name(&self, text: &str) -> Option<String> {
        let lowered = text.to_lowercase();
        self.patterns.iter().find_map(|re| {
            re.captures(&lowered)
                .and_then(|caps| caps.get(1))
                .map(|m| capitalize(m.as_str()))
        })
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

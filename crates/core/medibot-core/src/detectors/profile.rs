use super::ProfileDetector;
use crate::types::Profile;
use once_cell::sync::Lazy;
use regex::Regex;

/// Oldest age still classified as [`Profile::Child`]
pub const CHILD_MAX_AGE: u8 = 12;

/// Youngest age classified as [`Profile::Elder`]
pub const ELDER_MIN_AGE: u8 = 60;

static AGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btengo\s+(\d{1,2})\s+años\b").expect("age pattern compiles"));

/// Age declared as "tengo N años", for one- or two-digit N
pub fn extract_age(text: &str) -> Option<u8> {
    let lowered = text.to_lowercase();
    AGE_RE
        .captures(&lowered)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Keyword and declared-age classifier
///
/// Child is checked before elder, so text matching both is a child.
#[derive(Debug, Clone)]
pub struct KeywordProfileDetector {
    child: Regex,
    elder: Regex,
    child_max_age: u8,
    elder_min_age: u8,
}

impl Default for KeywordProfileDetector {
    fn default() -> Self {
        Self {
            child: Regex::new(r"\bniño\b").expect("child keywords compile"),
            elder: Regex::new(r"\b(?:adulto mayor|anciano)\b").expect("elder keywords compile"),
            child_max_age: CHILD_MAX_AGE,
            elder_min_age: ELDER_MIN_AGE,
        }
    }
}

impl KeywordProfileDetector {
    /// Override the age thresholds
    pub fn with_age_thresholds(mut self, child_max_age: u8, elder_min_age: u8) -> Self {
        self.child_max_age = child_max_age;
        self.elder_min_age = elder_min_age;
        self
    }
}

impl ProfileDetector for KeywordProfileDetector {
    fn detect_profile(&self, text: &str) -> Profile {
        let lowered = text.to_lowercase();
        let age = extract_age(&lowered);

        if self.child.is_match(&lowered) || age.is_some_and(|a| a <= self.child_max_age) {
            Profile::Child
        } else if self.elder.is_match(&lowered) || age.is_some_and(|a| a >= self.elder_min_age) {
            Profile::Elder
        } else {
            Profile::General
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Profile {
        KeywordProfileDetector::default().detect_profile(text)
    }

    #[test]
    fn test_declared_ages() {
        assert_eq!(detect("tengo 8 años"), Profile::Child);
        assert_eq!(detect("tengo 12 años"), Profile::Child);
        assert_eq!(detect("tengo 13 años"), Profile::General);
        assert_eq!(detect("tengo 59 años"), Profile::General);
        assert_eq!(detect("tengo 60 años"), Profile::Elder);
        assert_eq!(detect("Tengo 85 Años"), Profile::Elder);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(detect("soy un adulto mayor"), Profile::Elder);
        assert_eq!(detect("mi abuelo es anciano"), Profile::Elder);
        assert_eq!(detect("el niño tiene fiebre"), Profile::Child);
        assert_eq!(detect("hola, ¿cómo estás?"), Profile::General);
    }

    #[test]
    fn test_child_takes_precedence() {
        assert_eq!(detect("soy un niño y tengo 70 años"), Profile::Child);
        assert_eq!(detect("cuido a un anciano, tengo 10 años"), Profile::Child);
    }

    #[test]
    fn test_middle_age_ignores_nothing_else() {
        assert_eq!(detect("me llamo Juan, tengo 35 años"), Profile::General);
    }

    #[test]
    fn test_three_digit_age_is_not_an_age() {
        assert_eq!(extract_age("tengo 100 años"), None);
        assert_eq!(detect("tengo 100 años"), Profile::General);
    }

    #[test]
    fn test_extract_age() {
        assert_eq!(extract_age("Hola, me llamo Pedro, tengo 65 años"), Some(65));
        assert_eq!(extract_age("tengo hambre"), None);
    }

    #[test]
    fn test_custom_thresholds() {
        let detector = KeywordProfileDetector::default().with_age_thresholds(15, 70);
        assert_eq!(detector.detect_profile("tengo 14 años"), Profile::Child);
        assert_eq!(detector.detect_profile("tengo 65 años"), Profile::General);
    }
}

//! Version labels: a single uppercase letter, "A" for the first version.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Label of a document version ("A", "B", ... "Z").
///
/// Labels only move forward: `next()` of "Z" is an error rather than a
/// wrap-around or a two-letter label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionLabel(u8);

impl VersionLabel {
    /// Label of the first version of every document.
    pub const FIRST: VersionLabel = VersionLabel(b'A');

    /// Label after which no further version can be opened.
    pub const LAST: VersionLabel = VersionLabel(b'Z');

    /// Returns the label of the first version ("A").
    pub fn first() -> Self {
        Self::FIRST
    }

    /// Parses a label, accepting exactly one ASCII uppercase letter.
    ///
    /// Surrounding whitespace is ignored; "b" is rejected, not read as "B".
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => Ok(Self(c as u8)),
            (None, _) => Err(ValidationError::empty_field("version_label")),
            _ => Err(ValidationError::invalid_format(
                "version_label",
                format!("'{}' is not a single uppercase letter", trimmed),
            )),
        }
    }

    /// Returns the following label, or `None` once "Z" is reached.
    pub fn next(&self) -> Option<Self> {
        if *self >= Self::LAST {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }

    /// Returns the label as a char.
    pub fn as_char(&self) -> char {
        self.0 as char
    }

    /// Zero-based position of the label ("A" is 0).
    pub fn index(&self) -> u8 {
        self.0 - b'A'
    }
}

impl Default for VersionLabel {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for VersionLabel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionLabel {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VersionLabel> for String {
    fn from(label: VersionLabel) -> Self {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_is_a() {
        assert_eq!(VersionLabel::first().to_string(), "A");
        assert_eq!(VersionLabel::first().index(), 0);
    }

    #[test]
    fn next_increments_letter() {
        let a = VersionLabel::first();
        let b = a.next().unwrap();
        let c = b.next().unwrap();
        assert_eq!(b.to_string(), "B");
        assert_eq!(c.to_string(), "C");
        assert!(a < b && b < c);
    }

    #[test]
    fn next_after_z_is_none() {
        assert_eq!(VersionLabel::LAST.next(), None);
        assert_eq!(VersionLabel::parse("Y").unwrap().next(), Some(VersionLabel::LAST));
    }

    #[test]
    fn parse_rejects_lowercase() {
        assert_eq!(VersionLabel::parse(" C ").unwrap().to_string(), "C");
        assert!(VersionLabel::parse("b").is_err());
        assert!("a".parse::<VersionLabel>().is_err());
    }

    #[test]
    fn parse_rejects_non_letters() {
        assert!(VersionLabel::parse("").is_err());
        assert!(VersionLabel::parse("AB").is_err());
        assert!(VersionLabel::parse("1").is_err());
        assert!(VersionLabel::parse("É").is_err());
    }

    #[test]
    fn serde_uses_plain_string() {
        let json = serde_json::to_string(&VersionLabel::parse("D").unwrap()).unwrap();
        assert_eq!(json, "\"D\"");
        let back: VersionLabel = serde_json::from_str("\"d\"").unwrap();
        assert_eq!(back.to_string(), "D");
        assert!(serde_json::from_str::<VersionLabel>("\"D1\"").is_err());
    }
}

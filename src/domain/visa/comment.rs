//! Visa comments carry their kind as a text prefix ("VAO: reprendre le
//! carnet de détails"), which is how they are stored in the `visas` table.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

use super::VisaKind;

/// Maximum length of the free text after the prefix.
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Comment attached to an issued visa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaComment {
    kind: VisaKind,
    text: String,
}

impl VisaComment {
    /// Builds a comment, enforcing `min_length` characters for kinds that
    /// require one. VSO accepts an empty text.
    pub fn new(
        kind: VisaKind,
        text: impl Into<String>,
        min_length: usize,
    ) -> Result<Self, ValidationError> {
        let text = text.into().trim().to_string();
        let length = text.chars().count();

        if kind.requires_comment() {
            let min = min_length.max(1);
            if length == 0 {
                return Err(ValidationError::empty_field("comment"));
            }
            if length < min {
                return Err(ValidationError::out_of_range(
                    "comment",
                    min,
                    MAX_COMMENT_LENGTH,
                    length,
                ));
            }
        }
        if length > MAX_COMMENT_LENGTH {
            return Err(ValidationError::out_of_range(
                "comment",
                0,
                MAX_COMMENT_LENGTH,
                length,
            ));
        }

        Ok(Self { kind, text })
    }

    /// Parses a stored comment such as `"Refusé: cotes manquantes"`.
    pub fn parse(stored: &str) -> Result<Self, ValidationError> {
        let (prefix, text) = match stored.split_once(':') {
            Some((prefix, text)) => (prefix, text.trim()),
            None => (stored, ""),
        };
        let kind = VisaKind::from_prefix(prefix)?;
        Ok(Self {
            kind,
            text: text.to_string(),
        })
    }

    /// Stored form: `"<PREFIX>: <text>"`, or just the prefix when empty.
    pub fn encode(&self) -> String {
        if self.text.is_empty() {
            self.kind.prefix().to_string()
        } else {
            format!("{}: {}", self.kind.prefix(), self.text)
        }
    }

    pub fn kind(&self) -> VisaKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for VisaComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vso_accepts_empty_comment() {
        let comment = VisaComment::new(VisaKind::Vso, "", 10).unwrap();
        assert_eq!(comment.encode(), "VSO");
    }

    #[test]
    fn vao_rejects_empty_comment() {
        let err = VisaComment::new(VisaKind::Vao, "   ", 10).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyField { .. }));
    }

    #[test]
    fn refuse_rejects_short_comment() {
        let err = VisaComment::new(VisaKind::Refuse, "non", 10).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { actual: 3, .. }));
    }

    #[test]
    fn min_length_zero_still_requires_text() {
        assert!(VisaComment::new(VisaKind::Refuse, "", 0).is_err());
        assert!(VisaComment::new(VisaKind::Refuse, "x", 0).is_ok());
    }

    #[test]
    fn too_long_comment_rejected_even_for_vso() {
        let text = "a".repeat(MAX_COMMENT_LENGTH + 1);
        assert!(VisaComment::new(VisaKind::Vso, text, 0).is_err());
    }

    #[test]
    fn encode_prefixes_text() {
        let comment = VisaComment::new(VisaKind::Vao, " reprendre les cotes ", 5).unwrap();
        assert_eq!(comment.encode(), "VAO: reprendre les cotes");
    }

    #[test]
    fn parse_reads_prefix_and_text() {
        let comment = VisaComment::parse("Refusé: plan illisible").unwrap();
        assert_eq!(comment.kind(), VisaKind::Refuse);
        assert_eq!(comment.text(), "plan illisible");

        let bare = VisaComment::parse("VSO").unwrap();
        assert_eq!(bare.kind(), VisaKind::Vso);
        assert_eq!(bare.text(), "");
    }

    #[test]
    fn parse_keeps_colons_inside_text() {
        let comment = VisaComment::parse("VAO: voir note: §3").unwrap();
        assert_eq!(comment.text(), "voir note: §3");
    }

    #[test]
    fn parse_rejects_unknown_prefix() {
        assert!(VisaComment::parse("Bon: ok").is_err());
    }
}

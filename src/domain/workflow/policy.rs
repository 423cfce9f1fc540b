//! Tunable rules of the visa workflow.

use serde::Deserialize;

use crate::domain::foundation::Timestamp;
use crate::domain::visa::{VisaComment, VisaKind};

use super::WorkflowError;

/// Rules applied when diffusing and visaing documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct VisaPolicy {
    /// Minimum comment length (characters, trimmed) for VAO and Refusé.
    #[serde(default = "default_min_comment_length")]
    pub min_comment_length: usize,

    /// Days the MOE has to answer a diffusion; `0` means no due date.
    #[serde(default = "default_due_in_days")]
    pub due_in_days: u32,
}

impl VisaPolicy {
    /// Builds the stored comment for a verdict.
    ///
    /// # Errors
    ///
    /// - `InvalidComment` if the text is too short for the kind
    pub fn comment(&self, kind: VisaKind, text: &str) -> Result<VisaComment, WorkflowError> {
        VisaComment::new(kind, text, self.min_comment_length).map_err(WorkflowError::InvalidComment)
    }

    /// Due date for a visa requested at `from`.
    pub fn due_date(&self, from: &Timestamp) -> Option<Timestamp> {
        if self.due_in_days == 0 {
            None
        } else {
            Some(from.add_days(i64::from(self.due_in_days)))
        }
    }
}

impl Default for VisaPolicy {
    fn default() -> Self {
        Self {
            min_comment_length: default_min_comment_length(),
            due_in_days: default_due_in_days(),
        }
    }
}

fn default_min_comment_length() -> usize {
    3
}

fn default_due_in_days() -> u32 {
    15
}

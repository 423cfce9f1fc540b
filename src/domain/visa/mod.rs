//! Visa domain module.
//!
//! A visa is the MOE's formal verdict on a diffused version:
//! VSO (approved), VAO (approved with observations) or Refusé.

mod aggregate;
mod comment;
mod kind;

pub use aggregate::Visa;
pub use comment::{VisaComment, MAX_COMMENT_LENGTH};
pub use kind::{VisaDecision, VisaKind};

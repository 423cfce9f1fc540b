//! Visa handlers.

mod issue_visa;

pub use issue_visa::{IssueVisaCommand, IssueVisaHandler, IssueVisaResult};

//! Document domain module.
//!
//! Documents are the deliverables of a marché (plans, notes de calcul,
//! pièces écrites). Their status summarises the review state of the current
//! version.

mod aggregate;
mod status;

pub use aggregate::{Document, MAX_NAME_LENGTH, MAX_TYPE_LENGTH};
pub use status::DocumentStatus;

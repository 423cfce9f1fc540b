//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, roles, events, errors)
//! - `document` - Document aggregate and its review status
//! - `version` - Lettered versions of a document
//! - `visa` - MOE verdicts and their stored comments
//! - `workflow` - Transitions spanning document, version and visa

pub mod document;
pub mod foundation;
pub mod version;
pub mod visa;
pub mod workflow;

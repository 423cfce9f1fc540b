//! Workflow module - the document/version/visa state machine.
//!
//! All status changes that involve more than one aggregate live here:
//! diffusion, visa verdicts (with the automatic VAO version) and manual
//! revisions after a refusal.
//!
//! # Events
//!
//! - `DocumentCreated`, `VersionCreated`, `VersionFileAttached`
//! - `DocumentDiffused`, `VisaIssued`

mod errors;
mod events;
mod policy;
mod transitions;

pub use errors::WorkflowError;
pub use events::{
    DocumentCreated, DocumentDiffused, VersionCreated, VersionFileAttached, VersionOrigin,
    VisaIssued,
};
pub use policy::VisaPolicy;
pub use transitions::{apply_visa, diffuse, next_label, open_revision, VisaOutcome};

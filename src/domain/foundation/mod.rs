//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, roles, events and error types
//! that form the vocabulary of the document workflow.

mod command;
mod errors;
mod events;
mod ids;
mod role;
mod state_machine;
mod stored_file;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{DocumentId, MarcheId, UserId, VersionId, VisaId};
pub use role::{Capability, Role};
pub use state_machine::StateMachine;
pub use stored_file::{Bucket, StoredFile};
pub use timestamp::Timestamp;

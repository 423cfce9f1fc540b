//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-memory repositories and role directory
//! - `postgres` - PostgreSQL repositories and role directory
//! - `storage` - Blob storage (local filesystem, in-memory)
//! - `events` - Event bus implementations

pub mod events;
pub mod memory;
pub mod postgres;
pub mod storage;

pub use events::InMemoryEventBus;
pub use memory::{
    InMemoryDocumentRepository, InMemoryRoleDirectory, InMemoryVersionRepository,
    InMemoryVisaRepository,
};
pub use storage::{InMemoryBlobStorage, LocalBlobStorage};

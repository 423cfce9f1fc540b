//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `DocumentRepository` - Documents of a marché
//! - `VersionRepository` - Lettered versions, with compare-and-set status updates
//! - `VisaRepository` - Visa requests and verdicts
//!
//! ## Collaboration Ports
//!
//! - `RoleDirectory` - A user's role on a marché
//! - `BlobStorage` - Uploaded files
//! - `EventPublisher` - Domain event publication

mod blob_storage;
mod document_repository;
mod event_publisher;
mod role_directory;
mod version_repository;
mod visa_repository;

pub use blob_storage::{BlobStorage, StorageError};
pub use document_repository::DocumentRepository;
pub use event_publisher::EventPublisher;
pub use role_directory::RoleDirectory;
pub use version_repository::VersionRepository;
pub use visa_repository::VisaRepository;

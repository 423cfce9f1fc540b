//! In-memory persistence adapters.
//!
//! Used for tests and for running the workflow without a database. Each
//! adapter keeps its rows behind a `RwLock` and maps a poisoned lock to
//! `InternalError`.

mod document_repository;
mod role_directory;
mod version_repository;
mod visa_repository;

pub use document_repository::InMemoryDocumentRepository;
pub use role_directory::InMemoryRoleDirectory;
pub use version_repository::InMemoryVersionRepository;
pub use visa_repository::InMemoryVisaRepository;

use crate::domain::foundation::{DomainError, ErrorCode};

pub(crate) fn lock_poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "in-memory store lock poisoned")
}

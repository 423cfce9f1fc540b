use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::lock_poisoned;
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, VersionId};
use crate::domain::version::{Version, VersionLabel, VersionStatus};
use crate::ports::VersionRepository;

/// In-memory implementation of `VersionRepository`.
///
/// The compare-and-set in `update_status` runs under the write lock, which
/// gives the same guarantee as the conditional `UPDATE` of the Postgres
/// adapter.
#[derive(Debug, Default)]
pub struct InMemoryVersionRepository {
    versions: RwLock<HashMap<VersionId, Version>>,
}

impl InMemoryVersionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(id: &VersionId) -> DomainError {
        DomainError::new(
            ErrorCode::VersionNotFound,
            format!("Version not found: {}", id),
        )
    }

    fn status_changed(version: &Version, stored: VersionStatus, expected: VersionStatus) -> DomainError {
        DomainError::new(
            ErrorCode::ConcurrentModification,
            format!(
                "Version {} is '{}', expected '{}'",
                version.label(),
                stored,
                expected
            ),
        )
    }
}

#[async_trait]
impl VersionRepository for InMemoryVersionRepository {
    async fn save(&self, version: &Version) -> Result<(), DomainError> {
        let mut versions = self.versions.write().map_err(|_| lock_poisoned())?;
        let duplicate = versions.values().any(|v| {
            v.document_id() == version.document_id() && v.label() == version.label()
        });
        if duplicate || versions.contains_key(version.id()) {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!(
                    "Version {} already exists for document {}",
                    version.label(),
                    version.document_id()
                ),
            )
            .with_detail("field", "label"));
        }
        versions.insert(*version.id(), version.clone());
        Ok(())
    }

    async fn update(&self, version: &Version) -> Result<(), DomainError> {
        let mut versions = self.versions.write().map_err(|_| lock_poisoned())?;
        let stored = versions
            .get_mut(version.id())
            .ok_or_else(|| Self::not_found(version.id()))?;
        if stored.status() != version.status() {
            return Err(Self::status_changed(version, stored.status(), version.status()));
        }
        *stored = version.clone();
        Ok(())
    }

    async fn update_status(
        &self,
        version: &Version,
        expected: VersionStatus,
    ) -> Result<(), DomainError> {
        let mut versions = self.versions.write().map_err(|_| lock_poisoned())?;
        let stored = versions
            .get_mut(version.id())
            .ok_or_else(|| Self::not_found(version.id()))?;
        if stored.status() != expected {
            return Err(Self::status_changed(version, stored.status(), expected));
        }
        *stored = version.clone();
        Ok(())
    }

    async fn delete(&self, id: &VersionId) -> Result<(), DomainError> {
        let mut versions = self.versions.write().map_err(|_| lock_poisoned())?;
        versions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }

    async fn find_by_id(&self, id: &VersionId) -> Result<Option<Version>, DomainError> {
        let versions = self.versions.read().map_err(|_| lock_poisoned())?;
        Ok(versions.get(id).cloned())
    }

    async fn find_by_label(
        &self,
        document_id: &DocumentId,
        label: VersionLabel,
    ) -> Result<Option<Version>, DomainError> {
        let versions = self.versions.read().map_err(|_| lock_poisoned())?;
        Ok(versions
            .values()
            .find(|v| v.document_id() == document_id && v.label() == label)
            .cloned())
    }

    async fn list_by_document(&self, document_id: &DocumentId) -> Result<Vec<Version>, DomainError> {
        let versions = self.versions.read().map_err(|_| lock_poisoned())?;
        let mut found: Vec<Version> = versions
            .values()
            .filter(|v| v.document_id() == document_id)
            .cloned()
            .collect();
        found.sort_by_key(|v| v.label());
        Ok(found)
    }
}

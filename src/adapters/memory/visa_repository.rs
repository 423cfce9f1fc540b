use async_trait::async_trait;
use std::sync::RwLock;

use super::lock_poisoned;
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode};
use crate::domain::version::VersionLabel;
use crate::domain::visa::Visa;
use crate::ports::VisaRepository;

/// In-memory implementation of `VisaRepository`.
///
/// Visas are kept in insertion order, which is request order.
#[derive(Debug, Default)]
pub struct InMemoryVisaRepository {
    visas: RwLock<Vec<Visa>>,
}

impl InMemoryVisaRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VisaRepository for InMemoryVisaRepository {
    async fn save(&self, visa: &Visa) -> Result<(), DomainError> {
        let mut visas = self.visas.write().map_err(|_| lock_poisoned())?;
        if visas.iter().any(|v| v.id() == visa.id()) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Visa {} already exists", visa.id()),
            ));
        }
        visas.push(visa.clone());
        Ok(())
    }

    async fn update(&self, visa: &Visa) -> Result<(), DomainError> {
        let mut visas = self.visas.write().map_err(|_| lock_poisoned())?;
        let stored = visas
            .iter_mut()
            .find(|v| v.id() == visa.id())
            .ok_or_else(|| {
                DomainError::new(ErrorCode::VisaNotFound, format!("Visa not found: {}", visa.id()))
            })?;
        *stored = visa.clone();
        Ok(())
    }

    async fn find_pending(
        &self,
        document_id: &DocumentId,
        label: VersionLabel,
    ) -> Result<Option<Visa>, DomainError> {
        let visas = self.visas.read().map_err(|_| lock_poisoned())?;
        Ok(visas
            .iter()
            .find(|v| v.document_id() == document_id && v.version_label() == label && v.is_pending())
            .cloned())
    }

    async fn list_by_document(&self, document_id: &DocumentId) -> Result<Vec<Visa>, DomainError> {
        let visas = self.visas.read().map_err(|_| lock_poisoned())?;
        Ok(visas
            .iter()
            .filter(|v| v.document_id() == document_id)
            .cloned()
            .collect())
    }
}

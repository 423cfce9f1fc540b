use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::lock_poisoned;
use crate::domain::document::{Document, DocumentStatus};
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, MarcheId};
use crate::ports::DocumentRepository;

/// In-memory implementation of `DocumentRepository`.
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    documents: RwLock<HashMap<DocumentId, Document>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DomainError> {
        let mut documents = self.documents.write().map_err(|_| lock_poisoned())?;
        if documents.contains_key(document.id()) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Document {} already exists", document.id()),
            ));
        }
        documents.insert(*document.id(), document.clone());
        Ok(())
    }

    async fn update(&self, document: &Document) -> Result<(), DomainError> {
        let mut documents = self.documents.write().map_err(|_| lock_poisoned())?;
        match documents.get_mut(document.id()) {
            Some(stored) => {
                *stored = document.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::DocumentNotFound,
                format!("Document not found: {}", document.id()),
            )),
        }
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), DomainError> {
        let mut documents = self.documents.write().map_err(|_| lock_poisoned())?;
        match documents.remove(id) {
            Some(_) => Ok(()),
            None => Err(DomainError::new(
                ErrorCode::DocumentNotFound,
                format!("Document not found: {}", id),
            )),
        }
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let documents = self.documents.read().map_err(|_| lock_poisoned())?;
        Ok(documents.get(id).cloned())
    }

    async fn list_by_marche(
        &self,
        marche_id: &MarcheId,
        status: Option<DocumentStatus>,
    ) -> Result<Vec<Document>, DomainError> {
        let documents = self.documents.read().map_err(|_| lock_poisoned())?;
        let mut found: Vec<Document> = documents
            .values()
            .filter(|d| d.marche_id() == marche_id)
            .filter(|d| status.map_or(true, |s| d.status() == s))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn document(marche_id: MarcheId, name: &str) -> Document {
        Document::new(
            marche_id,
            name.to_string(),
            "Plan".to_string(),
            UserId::new("mandataire-1").unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_then_find() {
        let repo = InMemoryDocumentRepository::new();
        let doc = document(MarcheId::new(), "Plan RDC");
        repo.save(&doc).await.unwrap();

        let found = repo.find_by_id(doc.id()).await.unwrap().unwrap();
        assert_eq!(found.name(), "Plan RDC");
    }

    #[tokio::test]
    async fn save_twice_fails() {
        let repo = InMemoryDocumentRepository::new();
        let doc = document(MarcheId::new(), "Plan RDC");
        repo.save(&doc).await.unwrap();
        assert!(repo.save(&doc).await.is_err());
    }

    #[tokio::test]
    async fn update_unknown_is_not_found() {
        let repo = InMemoryDocumentRepository::new();
        let err = repo
            .update(&document(MarcheId::new(), "x"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentNotFound);
    }

    #[tokio::test]
    async fn list_filters_by_marche_and_status() {
        let repo = InMemoryDocumentRepository::new();
        let marche = MarcheId::new();
        let mut diffused = document(marche, "Plan R+1");
        diffused.transition_to(DocumentStatus::EnAttenteVisa).unwrap();

        repo.save(&document(marche, "Plan RDC")).await.unwrap();
        repo.save(&diffused).await.unwrap();
        repo.save(&document(MarcheId::new(), "Autre marché")).await.unwrap();

        assert_eq!(repo.list_by_marche(&marche, None).await.unwrap().len(), 2);
        let awaiting = repo
            .list_by_marche(&marche, Some(DocumentStatus::EnAttenteVisa))
            .await
            .unwrap();
        assert_eq!(awaiting.len(), 1);
        assert_eq!(awaiting[0].name(), "Plan R+1");
    }

    #[tokio::test]
    async fn delete_removes_document() {
        let repo = InMemoryDocumentRepository::new();
        let doc = document(MarcheId::new(), "Plan RDC");
        repo.save(&doc).await.unwrap();

        repo.delete(doc.id()).await.unwrap();

        assert!(repo.find_by_id(doc.id()).await.unwrap().is_none());
        let err = repo.delete(doc.id()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentNotFound);
    }
}

//! PostgreSQL implementation of DocumentRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::column;
use crate::domain::document::{Document, DocumentStatus};
use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, MarcheId, Timestamp, UserId,
};
use crate::domain::version::VersionLabel;
use crate::ports::DocumentRepository;

const SELECT_DOCUMENT: &str = r#"
    SELECT id, marche_id, name, doc_type, current_version, status,
           created_by, created_at, updated_at
    FROM documents
"#;

/// PostgreSQL implementation of DocumentRepository.
#[derive(Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO documents (
                id, marche_id, name, doc_type, current_version, status,
                created_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(document.id().as_uuid())
        .bind(document.marche_id().as_uuid())
        .bind(document.name())
        .bind(document.doc_type())
        .bind(document.current_version().to_string())
        .bind(document.status().as_label())
        .bind(document.created_by().as_str())
        .bind(document.created_at().as_datetime())
        .bind(document.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert document", e))?;

        Ok(())
    }

    async fn update(&self, document: &Document) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE documents SET
                name = $2,
                doc_type = $3,
                current_version = $4,
                status = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(document.id().as_uuid())
        .bind(document.name())
        .bind(document.doc_type())
        .bind(document.current_version().to_string())
        .bind(document.status().as_label())
        .bind(document.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update document", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DocumentNotFound,
                format!("Document not found: {}", document.id()),
            ));
        }
        Ok(())
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete document", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DocumentNotFound,
                format!("Document not found: {}", id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_DOCUMENT))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch document", e))?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn list_by_marche(
        &self,
        marche_id: &MarcheId,
        status: Option<DocumentStatus>,
    ) -> Result<Vec<Document>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE marche_id = $1 AND ($2::TEXT IS NULL OR status = $2) ORDER BY created_at DESC",
            SELECT_DOCUMENT
        ))
        .bind(marche_id.as_uuid())
        .bind(status.map(|s| s.as_label()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list documents", e))?;

        rows.iter().map(row_to_document).collect()
    }
}

fn row_to_document(row: &PgRow) -> Result<Document, DomainError> {
    let id: uuid::Uuid = column(row, "id")?;
    let marche_id: uuid::Uuid = column(row, "marche_id")?;
    let name: String = column(row, "name")?;
    let doc_type: String = column(row, "doc_type")?;
    let current_version: String = column(row, "current_version")?;
    let status: String = column(row, "status")?;
    let created_by: String = column(row, "created_by")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = column(row, "updated_at")?;

    Ok(Document::reconstitute(
        DocumentId::from_uuid(id),
        MarcheId::from_uuid(marche_id),
        name,
        doc_type,
        VersionLabel::parse(&current_version)?,
        DocumentStatus::from_label(&status)?,
        UserId::new(created_by)?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

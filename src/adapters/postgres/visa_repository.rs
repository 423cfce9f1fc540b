//! PostgreSQL implementation of VisaRepository.
//!
//! Comments are stored in their prefixed form ("VAO: ...").

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::{column, stored_file};
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, Timestamp, UserId, VisaId};
use crate::domain::version::VersionLabel;
use crate::domain::visa::{Visa, VisaComment, VisaDecision};
use crate::ports::VisaRepository;

const SELECT_VISA: &str = r#"
    SELECT id, document_id, version_label, requested_by, requested_at, due_at,
           decision, comment,
           attachment_bucket, attachment_key, attachment_name, attachment_size,
           attachment_checksum, issued_by, issued_at
    FROM visas
"#;

/// PostgreSQL implementation of VisaRepository.
#[derive(Clone)]
pub struct PostgresVisaRepository {
    pool: PgPool,
}

impl PostgresVisaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisaRepository for PostgresVisaRepository {
    async fn save(&self, visa: &Visa) -> Result<(), DomainError> {
        let attachment = visa.attachment();
        sqlx::query(
            r#"
            INSERT INTO visas (
                id, document_id, version_label, requested_by, requested_at, due_at,
                decision, comment,
                attachment_bucket, attachment_key, attachment_name, attachment_size,
                attachment_checksum, issued_by, issued_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(visa.id().as_uuid())
        .bind(visa.document_id().as_uuid())
        .bind(visa.version_label().to_string())
        .bind(visa.requested_by().as_str())
        .bind(visa.requested_at().as_datetime())
        .bind(visa.due_at().map(|t| *t.as_datetime()))
        .bind(visa.decision().as_str())
        .bind(visa.comment().map(VisaComment::encode))
        .bind(attachment.map(|f| f.bucket.as_str()))
        .bind(attachment.map(|f| f.key.as_str()))
        .bind(attachment.map(|f| f.file_name.as_str()))
        .bind(attachment.map(|f| f.size_bytes as i64))
        .bind(attachment.map(|f| f.checksum.as_str()))
        .bind(visa.issued_by().map(UserId::as_str))
        .bind(visa.issued_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert visa", e))?;

        Ok(())
    }

    async fn update(&self, visa: &Visa) -> Result<(), DomainError> {
        let attachment = visa.attachment();
        let result = sqlx::query(
            r#"
            UPDATE visas SET
                decision = $2,
                comment = $3,
                attachment_bucket = $4,
                attachment_key = $5,
                attachment_name = $6,
                attachment_size = $7,
                attachment_checksum = $8,
                issued_by = $9,
                issued_at = $10
            WHERE id = $1
            "#,
        )
        .bind(visa.id().as_uuid())
        .bind(visa.decision().as_str())
        .bind(visa.comment().map(VisaComment::encode))
        .bind(attachment.map(|f| f.bucket.as_str()))
        .bind(attachment.map(|f| f.key.as_str()))
        .bind(attachment.map(|f| f.file_name.as_str()))
        .bind(attachment.map(|f| f.size_bytes as i64))
        .bind(attachment.map(|f| f.checksum.as_str()))
        .bind(visa.issued_by().map(UserId::as_str))
        .bind(visa.issued_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update visa", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::VisaNotFound,
                format!("Visa not found: {}", visa.id()),
            ));
        }
        Ok(())
    }

    async fn find_pending(
        &self,
        document_id: &DocumentId,
        label: VersionLabel,
    ) -> Result<Option<Visa>, DomainError> {
        let row = sqlx::query(&format!(
            "{} WHERE document_id = $1 AND version_label = $2 AND decision = 'pending'",
            SELECT_VISA
        ))
        .bind(document_id.as_uuid())
        .bind(label.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch pending visa", e))?;

        row.as_ref().map(row_to_visa).transpose()
    }

    async fn list_by_document(&self, document_id: &DocumentId) -> Result<Vec<Visa>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE document_id = $1 ORDER BY requested_at",
            SELECT_VISA
        ))
        .bind(document_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list visas", e))?;

        rows.iter().map(row_to_visa).collect()
    }
}

fn row_to_visa(row: &PgRow) -> Result<Visa, DomainError> {
    let id: uuid::Uuid = column(row, "id")?;
    let document_id: uuid::Uuid = column(row, "document_id")?;
    let label: String = column(row, "version_label")?;
    let requested_by: String = column(row, "requested_by")?;
    let requested_at: chrono::DateTime<chrono::Utc> = column(row, "requested_at")?;
    let due_at: Option<chrono::DateTime<chrono::Utc>> = column(row, "due_at")?;
    let decision: String = column(row, "decision")?;
    let comment: Option<String> = column(row, "comment")?;
    let issued_by: Option<String> = column(row, "issued_by")?;
    let issued_at: Option<chrono::DateTime<chrono::Utc>> = column(row, "issued_at")?;

    Ok(Visa::reconstitute(
        VisaId::from_uuid(id),
        DocumentId::from_uuid(document_id),
        VersionLabel::parse(&label)?,
        UserId::new(requested_by)?,
        Timestamp::from_datetime(requested_at),
        due_at.map(Timestamp::from_datetime),
        VisaDecision::parse(&decision)?,
        comment.as_deref().map(VisaComment::parse).transpose()?,
        stored_file(row, "attachment", "attachment_name")?,
        issued_by.map(UserId::new).transpose()?,
        issued_at.map(Timestamp::from_datetime),
    ))
}

//! PostgreSQL implementation of VersionRepository.
//!
//! Both `update` and `update_status` are conditional on the stored status.
//! Zero affected rows on an existing version means another writer got there
//! first.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::{column, stored_file};
use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, Timestamp, UserId, VersionId,
};
use crate::domain::version::{Version, VersionLabel, VersionStatus};
use crate::ports::VersionRepository;

const SELECT_VERSION: &str = r#"
    SELECT id, document_id, label, status,
           file_bucket, file_key, file_name, file_size, file_checksum,
           created_by, created_at, updated_at
    FROM versions
"#;

/// PostgreSQL implementation of VersionRepository.
#[derive(Clone)]
pub struct PostgresVersionRepository {
    pool: PgPool,
}

impl PostgresVersionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn not_found(version: &Version) -> DomainError {
        DomainError::new(
            ErrorCode::VersionNotFound,
            format!("Version not found: {}", version.id()),
        )
    }

    /// Why a conditional update touched no row.
    async fn explain_miss(&self, version: &Version, expected: VersionStatus) -> DomainError {
        match self.find_by_id(version.id()).await {
            Ok(Some(current)) => DomainError::new(
                ErrorCode::ConcurrentModification,
                format!(
                    "Version {} is '{}', expected '{}'",
                    version.label(),
                    current.status(),
                    expected
                ),
            ),
            Ok(None) => Self::not_found(version),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl VersionRepository for PostgresVersionRepository {
    async fn save(&self, version: &Version) -> Result<(), DomainError> {
        let file = version.file();
        sqlx::query(
            r#"
            INSERT INTO versions (
                id, document_id, label, status,
                file_bucket, file_key, file_name, file_size, file_checksum,
                created_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(version.id().as_uuid())
        .bind(version.document_id().as_uuid())
        .bind(version.label().to_string())
        .bind(version.status().as_label())
        .bind(file.map(|f| f.bucket.as_str()))
        .bind(file.map(|f| f.key.as_str()))
        .bind(file.map(|f| f.file_name.as_str()))
        .bind(file.map(|f| f.size_bytes as i64))
        .bind(file.map(|f| f.checksum.as_str()))
        .bind(version.created_by().as_str())
        .bind(version.created_at().as_datetime())
        .bind(version.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::new(
                ErrorCode::ValidationFailed,
                format!(
                    "Version {} already exists for document {}",
                    version.label(),
                    version.document_id()
                ),
            )
            .with_detail("field", "label"),
            other => DomainError::database("Failed to insert version", other),
        })?;

        Ok(())
    }

    async fn update(&self, version: &Version) -> Result<(), DomainError> {
        let file = version.file();
        let result = sqlx::query(
            r#"
            UPDATE versions SET
                file_bucket = $3,
                file_key = $4,
                file_name = $5,
                file_size = $6,
                file_checksum = $7,
                updated_at = $8
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(version.id().as_uuid())
        .bind(version.status().as_label())
        .bind(file.map(|f| f.bucket.as_str()))
        .bind(file.map(|f| f.key.as_str()))
        .bind(file.map(|f| f.file_name.as_str()))
        .bind(file.map(|f| f.size_bytes as i64))
        .bind(file.map(|f| f.checksum.as_str()))
        .bind(version.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update version", e))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }
        Err(self.explain_miss(version, version.status()).await)
    }

    async fn update_status(
        &self,
        version: &Version,
        expected: VersionStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE versions SET status = $2, updated_at = $3
            WHERE id = $1 AND status = $4
            "#,
        )
        .bind(version.id().as_uuid())
        .bind(version.status().as_label())
        .bind(version.updated_at().as_datetime())
        .bind(expected.as_label())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update version status", e))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }
        Err(self.explain_miss(version, expected).await)
    }

    async fn delete(&self, id: &VersionId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM versions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete version", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::VersionNotFound,
                format!("Version not found: {}", id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &VersionId) -> Result<Option<Version>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_VERSION))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch version", e))?;

        row.as_ref().map(row_to_version).transpose()
    }

    async fn find_by_label(
        &self,
        document_id: &DocumentId,
        label: VersionLabel,
    ) -> Result<Option<Version>, DomainError> {
        let row = sqlx::query(&format!(
            "{} WHERE document_id = $1 AND label = $2",
            SELECT_VERSION
        ))
        .bind(document_id.as_uuid())
        .bind(label.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch version", e))?;

        row.as_ref().map(row_to_version).transpose()
    }

    async fn list_by_document(&self, document_id: &DocumentId) -> Result<Vec<Version>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE document_id = $1 ORDER BY label",
            SELECT_VERSION
        ))
        .bind(document_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list versions", e))?;

        rows.iter().map(row_to_version).collect()
    }
}

fn row_to_version(row: &PgRow) -> Result<Version, DomainError> {
    let id: uuid::Uuid = column(row, "id")?;
    let document_id: uuid::Uuid = column(row, "document_id")?;
    let label: String = column(row, "label")?;
    let status: String = column(row, "status")?;
    let created_by: String = column(row, "created_by")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = column(row, "updated_at")?;

    Ok(Version::reconstitute(
        VersionId::from_uuid(id),
        DocumentId::from_uuid(document_id),
        VersionLabel::parse(&label)?,
        VersionStatus::from_label(&status)?,
        stored_file(row, "file", "file_name")?,
        UserId::new(created_by)?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresDocumentRepository` - `documents` table
//! - `PostgresVersionRepository` - `versions` table, conditional status updates
//! - `PostgresVisaRepository` - `visas` table
//! - `PostgresRoleDirectory` - `marche_roles` table
//!
//! Schema lives in `migrations/` and is applied by [`run_migrations`].

mod document_repository;
mod role_directory;
mod version_repository;
mod visa_repository;

pub use document_repository::PostgresDocumentRepository;
pub use role_directory::PostgresRoleDirectory;
pub use version_repository::PostgresVersionRepository;
pub use visa_repository::PostgresVisaRepository;

use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{Bucket, DomainError, StoredFile};

/// Open a connection pool sized from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    tracing::info!(
        url = %config.redacted_url(),
        max_connections = config.max_connections,
        "connecting to database"
    );
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::database("Failed to connect to database", e))?;

    if config.run_migrations {
        run_migrations(&pool).await?;
    }
    Ok(pool)
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    tracing::info!("running database migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database("Failed to run migrations", e))?;
    tracing::info!("database migrations completed");
    Ok(())
}

/// Read a column, mapping decode failures to `DatabaseError`.
pub(crate) fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(&format!("Failed to read column '{}'", name), e))
}

/// Rebuild an optional `StoredFile` from a group of nullable columns.
pub(crate) fn stored_file(row: &PgRow, prefix: &str, name_column: &str) -> Result<Option<StoredFile>, DomainError> {
    let bucket: Option<String> = column(row, &format!("{}_bucket", prefix))?;
    let Some(bucket) = bucket else {
        return Ok(None);
    };
    let bucket: Bucket = bucket.parse().map_err(DomainError::from)?;
    let key: Option<String> = column(row, &format!("{}_key", prefix))?;
    let file_name: Option<String> = column(row, name_column)?;
    let size: Option<i64> = column(row, &format!("{}_size", prefix))?;
    let checksum: Option<String> = column(row, &format!("{}_checksum", prefix))?;

    Ok(Some(StoredFile {
        bucket,
        key: key.unwrap_or_default(),
        file_name: file_name.unwrap_or_default(),
        size_bytes: size.unwrap_or(0).max(0) as u64,
        checksum: checksum.unwrap_or_default(),
    }))
}

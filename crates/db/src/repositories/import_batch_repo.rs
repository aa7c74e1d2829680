//! Repository for the `import_batches` table.

use sqlx::PgPool;
use sirpol_core::types::DbId;

use crate::models::import_batch::{ImportBatch, ImportBatchSummary};

/// Column list for `import_batches` queries.
const COLUMNS: &str = "id, uploaded_by, created_at, updated_at";

/// Provides create/list/delete operations for import batches.
pub struct ImportBatchRepo;

impl ImportBatchRepo {
    /// Open a new batch for `uploaded_by`.
    pub async fn create(pool: &PgPool, uploaded_by: &str) -> Result<ImportBatch, sqlx::Error> {
        let query = format!(
            "INSERT INTO import_batches (uploaded_by) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ImportBatch>(&query)
            .bind(uploaded_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ImportBatch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM import_batches WHERE id = $1");
        sqlx::query_as::<_, ImportBatch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List batches newest-first with the number of incidents each holds.
    pub async fn list_with_counts(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ImportBatchSummary>, sqlx::Error> {
        sqlx::query_as::<_, ImportBatchSummary>(
            "SELECT b.id, b.uploaded_by, b.created_at, COUNT(i.id) AS incident_count \
             FROM import_batches b \
             LEFT JOIN incidents i ON i.batch_id = b.id \
             GROUP BY b.id \
             ORDER BY b.created_at DESC, b.id DESC \
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Delete a batch; its incidents go with it (`ON DELETE CASCADE`).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM import_batches WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

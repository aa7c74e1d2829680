//! Import batch model: one row per uploaded incident spreadsheet.

use serde::Serialize;
use sirpol_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `import_batches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImportBatch {
    pub id: DbId,
    pub uploaded_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Batch listing entry with the number of incidents it still owns.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImportBatchSummary {
    pub id: DbId,
    pub uploaded_by: String,
    pub created_at: Timestamp,
    pub incident_count: i64,
}

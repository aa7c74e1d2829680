//! Handlers for the incident bulk importer and its batches.
//!
//! Uploads are best-effort: each spreadsheet row is inserted on its own, and
//! rows that cannot be converted or stored are logged and skipped.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use sirpol_core::error::CoreError;
use sirpol_core::incident_import::{
    check_required_columns, map_row, parse_id_list, sheet_line, ColumnMap,
};
use sirpol_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use sirpol_core::spreadsheet::{decode_workbook, CellValue};
use sirpol_core::types::{DbId, Timestamp};
use sirpol_db::models::incident::{DeleteIncidents, Incident, IncidentListParams, IncidentPage};
use sirpol_db::repositories::{ImportBatchRepo, IncidentRepo};
use sqlx::PgPool;

use crate::error::{is_connectivity_error, AppError, AppResult};
use crate::middleware::actor::Actor;
use crate::middleware::input::{AppJson, AppPath, AppQuery};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of a spreadsheet upload.
#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub batch_id: DbId,
    pub uploaded_by: String,
    pub created_at: Timestamp,
    pub created: usize,
    pub skipped: usize,
    pub incidents: Vec<Incident>,
}

/// Result of a bulk delete.
#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub deleted: u64,
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// POST /api/v1/incidents/upload
///
/// Accepts a multipart form with a `file` field holding an `.xlsx`
/// workbook. The header row must contain every required column.
pub async fn upload_incidents(
    actor: Actor,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_bytes = Some(data.to_vec());
        }
    }

    let bytes = file_bytes
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;

    let sheet = decode_workbook(bytes).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let columns = check_required_columns(&sheet.headers)?;

    let batch = ImportBatchRepo::create(&state.pool, &actor.name).await?;

    let (incidents, skipped) = import_rows(&state.pool, batch.id, &columns, &sheet.rows).await?;

    tracing::info!(
        batch_id = batch.id,
        uploaded_by = %actor.name,
        created = incidents.len(),
        skipped,
        "Incident upload processed",
    );

    if incidents.is_empty() {
        return Err(AppError::BadRequest(format!(
            "No rows could be saved ({skipped} rows skipped)"
        )));
    }

    let result = UploadResult {
        batch_id: batch.id,
        uploaded_by: batch.uploaded_by,
        created_at: batch.created_at,
        created: incidents.len(),
        skipped,
        incidents,
    };

    Ok((StatusCode::CREATED, Json(DataResponse { data: result })))
}

/// Insert one incident per row of `rows` into batch `batch_id`.
///
/// Rows that fail to convert or that the database rejects are skipped and
/// counted. A connectivity error aborts the import: every later row would
/// fail the same way. Rows saved before the abort are kept.
pub async fn import_rows(
    pool: &PgPool,
    batch_id: DbId,
    columns: &ColumnMap,
    rows: &[Vec<CellValue>],
) -> AppResult<(Vec<Incident>, usize)> {
    let mut incidents = Vec::new();
    let mut skipped = 0usize;
    for (index, row) in rows.iter().enumerate() {
        let line = sheet_line(index);
        let record = match map_row(columns, row) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(batch_id, line, error = %e, "Skipping unreadable row");
                skipped += 1;
                continue;
            }
        };

        match IncidentRepo::create(pool, batch_id, &record).await {
            Ok(incident) => incidents.push(incident),
            Err(e) if is_connectivity_error(&e) => {
                tracing::error!(batch_id, line, error = %e, "Import aborted");
                return Err(AppError::Database(e));
            }
            Err(e) => {
                tracing::warn!(batch_id, line, error = %e, "Skipping rejected row");
                skipped += 1;
            }
        }
    }
    Ok((incidents, skipped))
}

// ---------------------------------------------------------------------------
// Incidents
// ---------------------------------------------------------------------------

/// GET /api/v1/incidents
pub async fn list_incidents(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<IncidentListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);

    let items = IncidentRepo::list(&state.pool, params.batch_id, limit, offset).await?;
    let total = IncidentRepo::count(&state.pool, params.batch_id).await?;

    Ok(Json(DataResponse {
        data: IncidentPage {
            items,
            total,
            limit,
            offset,
        },
    }))
}

/// DELETE /api/v1/incidents/delete-batch
///
/// Body: `{"ids": [1, 2, 3]}`. Ids that do not exist are ignored.
pub async fn delete_incidents(
    State(state): State<AppState>,
    AppJson(input): AppJson<DeleteIncidents>,
) -> AppResult<impl IntoResponse> {
    let ids = parse_id_list(input.ids.as_ref())?;
    let deleted = IncidentRepo::delete_by_ids(&state.pool, &ids).await?;

    tracing::info!(requested = ids.len(), deleted, "Incidents deleted");

    Ok(Json(DataResponse {
        data: DeleteResult { deleted },
    }))
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

/// GET /api/v1/incidents/batches
pub async fn list_batches(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let batches = ImportBatchRepo::list_with_counts(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: batches }))
}

/// DELETE /api/v1/incidents/batches/{id}
///
/// Deletes the batch together with its incidents.
pub async fn delete_batch(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ImportBatchRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ImportBatch",
            id,
        }));
    }
    tracing::info!(batch_id = id, "Import batch deleted");
    Ok(StatusCode::NO_CONTENT)
}

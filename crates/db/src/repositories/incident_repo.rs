//! Repository for the `incidents` table.
//!
//! Incidents are always read joined with their import batch so responses
//! carry the uploader and upload time.

use sqlx::PgPool;
use sirpol_core::incident_import::IncidentRecord;
use sirpol_core::types::DbId;

use crate::models::incident::Incident;

/// Data columns written on insert, in bind order.
const FIELDS: &str = "\
    document_id, book, complaint_number, complaint_type, complaint_status, \
    category, subcategory, modality, event_date, event_time, \
    department, province, district, street_type, address, block, \
    dni, paternal_surname, maternal_surname, first_name, person_status, \
    birth_date, birth_time, age, sex, marital_status, education_level, \
    occupation, birth_country, region, police_station, \
    registered_date, registered_time, coord_x, coord_y";

/// Select list over `incidents i LEFT JOIN import_batches b`.
const COLUMNS: &str = "\
    i.id, i.batch_id, b.uploaded_by, b.created_at AS batch_created_at, \
    i.document_id, i.book, i.complaint_number, i.complaint_type, i.complaint_status, \
    i.category, i.subcategory, i.modality, i.event_date, i.event_time, \
    i.department, i.province, i.district, i.street_type, i.address, i.block, \
    i.dni, i.paternal_surname, i.maternal_surname, i.first_name, i.person_status, \
    i.birth_date, i.birth_time, i.age, i.sex, i.marital_status, i.education_level, \
    i.occupation, i.birth_country, i.region, i.police_station, \
    i.registered_date, i.registered_time, i.coord_x, i.coord_y, \
    i.created_at, i.updated_at";

/// Provides insert/list/delete operations for incidents.
pub struct IncidentRepo;

impl IncidentRepo {
    /// Insert one normalized row under `batch_id`, returning it joined with
    /// its batch.
    pub async fn create(
        pool: &PgPool,
        batch_id: DbId,
        record: &IncidentRecord,
    ) -> Result<Incident, sqlx::Error> {
        let placeholders = (2..=36).map(|n| format!("${n}")).collect::<Vec<_>>().join(", ");
        let query = format!(
            "WITH i AS ( \
                INSERT INTO incidents (batch_id, {FIELDS}) \
                VALUES ($1, {placeholders}) \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM i LEFT JOIN import_batches b ON b.id = i.batch_id"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(batch_id)
            .bind(record.document_id)
            .bind(&record.book)
            .bind(&record.complaint_number)
            .bind(&record.complaint_type)
            .bind(&record.complaint_status)
            .bind(&record.category)
            .bind(&record.subcategory)
            .bind(&record.modality)
            .bind(record.event_date)
            .bind(record.event_time)
            .bind(&record.department)
            .bind(&record.province)
            .bind(&record.district)
            .bind(&record.street_type)
            .bind(&record.address)
            .bind(&record.block)
            .bind(&record.dni)
            .bind(&record.paternal_surname)
            .bind(&record.maternal_surname)
            .bind(&record.first_name)
            .bind(&record.person_status)
            .bind(record.birth_date)
            .bind(record.birth_time)
            .bind(record.age)
            .bind(&record.sex)
            .bind(&record.marital_status)
            .bind(&record.education_level)
            .bind(&record.occupation)
            .bind(&record.birth_country)
            .bind(&record.region)
            .bind(&record.police_station)
            .bind(record.registered_date)
            .bind(record.registered_time)
            .bind(record.coord_x)
            .bind(record.coord_y)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Incident>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM incidents i \
             LEFT JOIN import_batches b ON b.id = i.batch_id \
             WHERE i.id = $1"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List incidents newest-first, optionally restricted to one batch.
    pub async fn list(
        pool: &PgPool,
        batch_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Incident>, sqlx::Error> {
        let mut param_idx: usize = 1;
        let where_clause = if batch_id.is_some() {
            param_idx += 1;
            "WHERE i.batch_id = $1"
        } else {
            ""
        };

        let query = format!(
            "SELECT {COLUMNS} FROM incidents i \
             LEFT JOIN import_batches b ON b.id = i.batch_id \
             {where_clause} \
             ORDER BY i.created_at DESC, i.id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, Incident>(&query);
        if let Some(id) = batch_id {
            q = q.bind(id);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count incidents, optionally restricted to one batch.
    pub async fn count(pool: &PgPool, batch_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM incidents WHERE ($1::BIGINT IS NULL OR batch_id = $1)",
        )
        .bind(batch_id)
        .fetch_one(pool)
        .await
    }

    /// Delete every incident whose id is in `ids`. Unknown ids are ignored;
    /// returns the number of rows removed.
    pub async fn delete_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM incidents WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

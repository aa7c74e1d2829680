//! Repository for the `drug_seizures` table and its report aggregates.

use sqlx::PgPool;
use sirpol_core::drug_seizure::{KindTotals, RankingDimension, SeizureKind};
use sirpol_core::types::{Date, DbId};

use crate::models::drug_seizure::{
    CreateDrugSeizure, DrugSeizure, DrugSeizureListParams, RankingEntry, SummaryParams,
};
use crate::repositories::RegistryCounterRepo;

/// Column list for `drug_seizures` queries.
const COLUMNS: &str = "\
    id, kind, registry_number, seized_date, seized_time, \
    department_id, province_id, district_id, directorate_id, \
    specialized_directorate_id, division_id, police_department_id, unit_id, \
    sicpip_note, intervention_type, quantity_units, quantity_kg, recorded_by, \
    updated_by, created_at, updated_at";

/// Shared report filter. Each bound applies only when set.
const REPORT_FILTER: &str = "\
    ($1::DATE IS NULL OR seized_date >= $1) \
    AND ($2::DATE IS NULL OR seized_date <= $2) \
    AND ($3::BIGINT IS NULL OR department_id = $3)";

/// Provides CRUD and report queries for drug seizures.
pub struct DrugSeizureRepo;

impl DrugSeizureRepo {
    /// Insert a seizure, numbering it from the kind's registry counter in the
    /// same transaction.
    pub async fn create(
        pool: &PgPool,
        kind: SeizureKind,
        intervention_type: &str,
        input: &CreateDrugSeizure,
        recorded_by: &str,
    ) -> Result<DrugSeizure, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let registry_number =
            RegistryCounterRepo::next_value(&mut *tx, &kind.registry_scope()).await?;

        let query = format!(
            "INSERT INTO drug_seizures \
                (kind, registry_number, seized_date, seized_time, \
                 department_id, province_id, district_id, directorate_id, \
                 specialized_directorate_id, division_id, police_department_id, unit_id, \
                 sicpip_note, intervention_type, quantity_units, quantity_kg, recorded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING {COLUMNS}"
        );
        let seizure = sqlx::query_as::<_, DrugSeizure>(&query)
            .bind(kind.as_str())
            .bind(registry_number)
            .bind(input.seized_date)
            .bind(input.seized_time)
            .bind(input.department_id)
            .bind(input.province_id)
            .bind(input.district_id)
            .bind(input.directorate_id)
            .bind(input.specialized_directorate_id)
            .bind(input.division_id)
            .bind(input.police_department_id)
            .bind(input.unit_id)
            .bind(input.sicpip_note.trim())
            .bind(intervention_type)
            .bind(input.quantity_units)
            .bind(input.quantity_kg)
            .bind(recorded_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(seizure)
    }

    /// Overwrite every editable field. Kind and registry number stay fixed;
    /// returns `None` when no seizure of `kind` has this id.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        kind: SeizureKind,
        intervention_type: &str,
        input: &CreateDrugSeizure,
        updated_by: &str,
    ) -> Result<Option<DrugSeizure>, sqlx::Error> {
        let query = format!(
            "UPDATE drug_seizures SET \
                seized_date = $1, seized_time = $2, department_id = $3, province_id = $4, \
                district_id = $5, directorate_id = $6, specialized_directorate_id = $7, \
                division_id = $8, police_department_id = $9, unit_id = $10, \
                sicpip_note = $11, intervention_type = $12, quantity_units = $13, \
                quantity_kg = $14, updated_by = $15 \
             WHERE id = $16 AND kind = $17 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DrugSeizure>(&query)
            .bind(input.seized_date)
            .bind(input.seized_time)
            .bind(input.department_id)
            .bind(input.province_id)
            .bind(input.district_id)
            .bind(input.directorate_id)
            .bind(input.specialized_directorate_id)
            .bind(input.division_id)
            .bind(input.police_department_id)
            .bind(input.unit_id)
            .bind(input.sicpip_note.trim())
            .bind(intervention_type)
            .bind(input.quantity_units)
            .bind(input.quantity_kg)
            .bind(updated_by)
            .bind(id)
            .bind(kind.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DrugSeizure>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drug_seizures WHERE id = $1");
        sqlx::query_as::<_, DrugSeizure>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List seizures newest-first. `kind` must already be validated.
    pub async fn list(
        pool: &PgPool,
        kind: Option<SeizureKind>,
        params: &DrugSeizureListParams,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DrugSeizure>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if kind.is_some() {
            conditions.push(format!("kind = ${param_idx}"));
            param_idx += 1;
        }
        if params.date_from.is_some() {
            conditions.push(format!("seized_date >= ${param_idx}"));
            param_idx += 1;
        }
        if params.date_to.is_some() {
            conditions.push(format!("seized_date <= ${param_idx}"));
            param_idx += 1;
        }
        if params.department_id.is_some() {
            conditions.push(format!("department_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM drug_seizures {where_clause} \
             ORDER BY seized_date DESC, seized_time DESC, id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, DrugSeizure>(&query);
        if let Some(k) = kind {
            q = q.bind(k.as_str());
        }
        if let Some(from) = params.date_from {
            q = q.bind(from);
        }
        if let Some(to) = params.date_to {
            q = q.bind(to);
        }
        if let Some(dep) = params.department_id {
            q = q.bind(dep);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM drug_seizures WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Per-kind operation counts and quantity totals. Units and kilograms
    /// share one column since each kind uses only one of them.
    pub async fn kind_totals(
        pool: &PgPool,
        filters: &SummaryParams,
    ) -> Result<Vec<KindTotals>, sqlx::Error> {
        let query = format!(
            "SELECT kind, COUNT(*) AS operations, \
                    COALESCE(SUM(COALESCE(quantity_units::DOUBLE PRECISION, quantity_kg)), 0) \
                        AS total_quantity \
             FROM drug_seizures \
             WHERE {REPORT_FILTER} \
             GROUP BY kind"
        );
        let rows: Vec<(String, i64, f64)> = sqlx::query_as(&query)
            .bind(filters.date_from)
            .bind(filters.date_to)
            .bind(filters.department_id)
            .fetch_all(pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(kind, operations, total_quantity)| KindTotals {
                kind,
                operations,
                total_quantity,
            })
            .collect())
    }

    /// Seizure counts per intervention type.
    pub async fn intervention_counts(
        pool: &PgPool,
        filters: &SummaryParams,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let query = format!(
            "SELECT intervention_type, COUNT(*) \
             FROM drug_seizures \
             WHERE {REPORT_FILTER} \
             GROUP BY intervention_type"
        );
        sqlx::query_as(&query)
            .bind(filters.date_from)
            .bind(filters.date_to)
            .bind(filters.department_id)
            .fetch_all(pool)
            .await
    }

    /// Top `limit` departments or police directorates by seizure count,
    /// ties broken by name.
    pub async fn ranking(
        pool: &PgPool,
        dimension: RankingDimension,
        date_from: Option<Date>,
        date_to: Option<Date>,
        limit: i64,
    ) -> Result<Vec<RankingEntry>, sqlx::Error> {
        let (table, column) = match dimension {
            RankingDimension::Department => ("departments", "department_id"),
            RankingDimension::Unit => ("police_directorates", "directorate_id"),
        };
        let query = format!(
            "SELECT g.id, g.name, g.code, COUNT(s.id) AS total \
             FROM drug_seizures s \
             JOIN {table} g ON g.id = s.{column} \
             WHERE ($1::DATE IS NULL OR s.seized_date >= $1) \
               AND ($2::DATE IS NULL OR s.seized_date <= $2) \
             GROUP BY g.id, g.name, g.code \
             ORDER BY total DESC, g.name ASC \
             LIMIT $3"
        );
        sqlx::query_as::<_, RankingEntry>(&query)
            .bind(date_from)
            .bind(date_to)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

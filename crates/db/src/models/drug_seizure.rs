//! Drug-seizure record model and report query parameters.

use serde::{Deserialize, Serialize};
use sirpol_core::types::{Date, DbId, Time, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `drug_seizures` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DrugSeizure {
    pub id: DbId,
    pub kind: String,
    pub registry_number: i64,
    pub seized_date: Date,
    pub seized_time: Time,
    pub department_id: DbId,
    pub province_id: DbId,
    pub district_id: DbId,
    pub directorate_id: DbId,
    pub specialized_directorate_id: Option<DbId>,
    pub division_id: DbId,
    pub police_department_id: DbId,
    pub unit_id: Option<DbId>,
    pub sicpip_note: String,
    pub intervention_type: String,
    pub quantity_units: Option<i32>,
    pub quantity_kg: Option<f64>,
    pub recorded_by: String,
    pub updated_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /drug-seizures` and `PUT /drug-seizures/{id}`. On update
/// `kind` must match the stored record. `kind` and `intervention_type` are
/// checked against the core enums by the handler.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDrugSeizure {
    pub kind: String,
    pub seized_date: Date,
    pub seized_time: Time,
    pub department_id: DbId,
    pub province_id: DbId,
    pub district_id: DbId,
    pub directorate_id: DbId,
    pub specialized_directorate_id: Option<DbId>,
    pub division_id: DbId,
    pub police_department_id: DbId,
    pub unit_id: Option<DbId>,
    #[validate(length(min = 1, max = 100))]
    pub sicpip_note: String,
    pub intervention_type: String,
    pub quantity_units: Option<i32>,
    pub quantity_kg: Option<f64>,
}

/// Query parameters for listing seizures.
#[derive(Debug, Default, Deserialize)]
pub struct DrugSeizureListParams {
    pub kind: Option<String>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub department_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /reports/drug-seizures/summary`.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub department_id: Option<DbId>,
}

/// Query parameters for `GET /reports/drug-seizures/ranking`.
#[derive(Debug, Default, Deserialize)]
pub struct RankingParams {
    pub by: Option<String>,
    pub limit: Option<i64>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
}

/// One ranking line: a department or directorate and its seizure count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RankingEntry {
    pub id: DbId,
    pub name: String,
    pub code: Option<String>,
    pub total: i64,
}

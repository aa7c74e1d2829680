//! Incident model, list filters and bulk-delete DTO.

use serde::{Deserialize, Serialize};
use sirpol_core::incident_import::serialize_finite;
use sirpol_core::types::{Date, DbId, Time, Timestamp};
use sqlx::FromRow;

/// A row from the `incidents` table joined with its import batch.
///
/// `uploaded_by` and `batch_created_at` come from the batch and are `None`
/// for incidents without one.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Incident {
    pub id: DbId,
    pub batch_id: Option<DbId>,
    pub uploaded_by: Option<String>,
    pub batch_created_at: Option<Timestamp>,
    pub document_id: i64,
    pub book: String,
    pub complaint_number: String,
    pub complaint_type: String,
    pub complaint_status: String,
    pub category: String,
    pub subcategory: String,
    pub modality: String,
    pub event_date: Option<Date>,
    pub event_time: Option<Time>,
    pub department: String,
    pub province: String,
    pub district: String,
    pub street_type: String,
    pub address: String,
    pub block: String,
    pub dni: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub first_name: String,
    pub person_status: String,
    pub birth_date: Option<Date>,
    pub birth_time: Option<Time>,
    pub age: Option<i32>,
    pub sex: String,
    pub marital_status: String,
    pub education_level: String,
    pub occupation: String,
    pub birth_country: String,
    pub region: String,
    pub police_station: String,
    pub registered_date: Option<Date>,
    pub registered_time: Option<Time>,
    #[serde(serialize_with = "serialize_finite")]
    pub coord_x: f64,
    #[serde(serialize_with = "serialize_finite")]
    pub coord_y: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Query parameters for listing incidents.
#[derive(Debug, Deserialize)]
pub struct IncidentListParams {
    pub batch_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Body of `DELETE /incidents/delete-batch`.
///
/// `ids` is kept as raw JSON so a non-list value produces a validation
/// error rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct DeleteIncidents {
    #[serde(default)]
    pub ids: Option<serde_json::Value>,
}

/// One page of incidents plus the total matching count.
#[derive(Debug, Serialize)]
pub struct IncidentPage {
    pub items: Vec<Incident>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

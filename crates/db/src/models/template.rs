//! Form template model.

use serde::Serialize;
use sirpol_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `form_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormTemplate {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

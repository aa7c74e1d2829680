//! Reference catalog row and DTOs, shared by every reference table.

use serde::{Deserialize, Serialize};
use sirpol_core::reference::ReferenceKind;
use sirpol_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from any reference table. `parent_id` is the table's parent
/// foreign key, or `None` for root tables.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReferenceItem {
    pub id: DbId,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a reference row.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReferenceItem {
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
}

impl CreateReferenceItem {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            code: None,
            description: None,
            parent_id: None,
        }
    }

    pub fn child_of(parent_id: DbId, name: &str) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::named(name)
        }
    }
}

/// Query parameters for `GET /reference/{kind}`.
///
/// Besides the generic `parent_id`, each child table accepts its own named
/// parent parameter (`departamento_id`, `provincia_id`, ...).
#[derive(Debug, Default, Deserialize)]
pub struct ReferenceListParams {
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub parent_id: Option<DbId>,
    pub departamento_id: Option<DbId>,
    pub provincia_id: Option<DbId>,
    pub fuero_id: Option<DbId>,
    pub general_id: Option<DbId>,
    pub especifico_id: Option<DbId>,
    pub direccion_id: Option<DbId>,
    pub categoria_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ReferenceListParams {
    /// Parent filter for `kind`: its named parameter, else `parent_id`.
    pub fn parent_filter(&self, kind: ReferenceKind) -> Option<DbId> {
        let named = match kind.parent_param() {
            Some("departamento_id") => self.departamento_id,
            Some("provincia_id") => self.provincia_id,
            Some("fuero_id") => self.fuero_id,
            Some("general_id") => self.general_id,
            Some("especifico_id") => self.especifico_id,
            Some("direccion_id") => self.direccion_id,
            Some("categoria_id") => self.categoria_id,
            _ => None,
        };
        named.or(self.parent_id)
    }
}

/// Query parameters for `GET /reference/cascade`.
#[derive(Debug, Deserialize)]
pub struct CascadeParams {
    #[serde(rename = "type")]
    pub filter: Option<String>,
    pub parent_id: Option<DbId>,
}

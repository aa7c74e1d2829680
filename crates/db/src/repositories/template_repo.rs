//! Repository for the `form_templates` table.

use sqlx::PgPool;
use sirpol_core::types::DbId;

use crate::models::template::FormTemplate;

/// Column list for `form_templates` queries.
const COLUMNS: &str = "id, name, description, kind, is_active, created_at, updated_at";

pub struct TemplateRepo;

impl TemplateRepo {
    /// Active templates ordered by name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<FormTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM form_templates WHERE is_active ORDER BY name ASC"
        );
        sqlx::query_as::<_, FormTemplate>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FormTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM form_templates WHERE id = $1");
        sqlx::query_as::<_, FormTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<FormTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM form_templates WHERE name = $1");
        sqlx::query_as::<_, FormTemplate>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Toggle a template's `is_active` flag.
    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        is_active: bool,
    ) -> Result<Option<FormTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE form_templates SET is_active = $1 WHERE id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormTemplate>(&query)
            .bind(is_active)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

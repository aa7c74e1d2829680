//! Repository for the reference catalog tables.
//!
//! Every reference table shares the same shape (`id`, `name`, `code`,
//! `description`, optional parent FK, timestamps), so one repository serves
//! all of them, keyed by [`ReferenceKind`]. Table and column names come from
//! the enum, never from user input.

use sqlx::PgPool;
use sirpol_core::reference::ReferenceKind;
use sirpol_core::search::NameOrdering;
use sirpol_core::types::DbId;

use crate::models::reference::{CreateReferenceItem, ReferenceItem};

/// Select list for `kind`, aliasing its parent FK to `parent_id`.
fn columns(kind: ReferenceKind) -> String {
    let parent = kind.parent_column().unwrap_or("NULL::BIGINT");
    format!("id, name, code, description, {parent} AS parent_id, created_at, updated_at")
}

/// Read and insert operations over any reference table.
pub struct ReferenceRepo;

impl ReferenceRepo {
    /// Insert a row. `input.parent_id` is ignored for root tables.
    pub async fn create(
        pool: &PgPool,
        kind: ReferenceKind,
        input: &CreateReferenceItem,
    ) -> Result<ReferenceItem, sqlx::Error> {
        let table = kind.table();
        let cols = columns(kind);
        match kind.parent_column() {
            Some(parent) => {
                let query = format!(
                    "INSERT INTO {table} ({parent}, name, code, description) \
                     VALUES ($1, $2, $3, $4) RETURNING {cols}"
                );
                sqlx::query_as::<_, ReferenceItem>(&query)
                    .bind(input.parent_id)
                    .bind(&input.name)
                    .bind(&input.code)
                    .bind(&input.description)
                    .fetch_one(pool)
                    .await
            }
            None => {
                let query = format!(
                    "INSERT INTO {table} (name, code, description) \
                     VALUES ($1, $2, $3) RETURNING {cols}"
                );
                sqlx::query_as::<_, ReferenceItem>(&query)
                    .bind(&input.name)
                    .bind(&input.code)
                    .bind(&input.description)
                    .fetch_one(pool)
                    .await
            }
        }
    }

    pub async fn find_by_id(
        pool: &PgPool,
        kind: ReferenceKind,
        id: DbId,
    ) -> Result<Option<ReferenceItem>, sqlx::Error> {
        let query = format!("SELECT {} FROM {} WHERE id = $1", columns(kind), kind.table());
        sqlx::query_as::<_, ReferenceItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List rows with an optional `ILIKE` pattern on `name` and an optional
    /// parent filter. The parent filter is ignored for root tables.
    pub async fn list(
        pool: &PgPool,
        kind: ReferenceKind,
        name_pattern: Option<&str>,
        parent_id: Option<DbId>,
        ordering: NameOrdering,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReferenceItem>, sqlx::Error> {
        let parent_filter = kind.parent_column().zip(parent_id);

        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if name_pattern.is_some() {
            conditions.push(format!("name ILIKE ${param_idx}"));
            param_idx += 1;
        }
        if let Some((column, _)) = parent_filter {
            conditions.push(format!("{column} = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {} FROM {} {where_clause} \
             ORDER BY {} \
             LIMIT ${param_idx} OFFSET ${}",
            columns(kind),
            kind.table(),
            ordering.sql(),
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, ReferenceItem>(&query);
        if let Some(pattern) = name_pattern {
            q = q.bind(pattern);
        }
        if let Some((_, id)) = parent_filter {
            q = q.bind(id);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// All rows of `kind` whose parent is `parent_id`, ordered by name.
    /// Root tables have no children relation and yield an empty list.
    pub async fn children(
        pool: &PgPool,
        kind: ReferenceKind,
        parent_id: DbId,
    ) -> Result<Vec<ReferenceItem>, sqlx::Error> {
        let Some(parent) = kind.parent_column() else {
            return Ok(Vec::new());
        };
        let query = format!(
            "SELECT {} FROM {} WHERE {parent} = $1 ORDER BY {}",
            columns(kind),
            kind.table(),
            NameOrdering::Ascending.sql()
        );
        sqlx::query_as::<_, ReferenceItem>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }
}

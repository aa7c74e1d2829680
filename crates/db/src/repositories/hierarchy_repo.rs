//! Ancestor lookups for cascading reference checks.

use sqlx::PgPool;
use sirpol_core::reference::ReferenceKind;
use sirpol_core::types::DbId;

/// Walks parent foreign keys up the reference hierarchy.
pub struct HierarchyRepo;

impl HierarchyRepo {
    /// Stored ancestor ids of row `id` in `kind`'s table, ordered from the
    /// hierarchy root down to the immediate parent.
    ///
    /// Returns `None` when the row does not exist. A root row yields an
    /// empty list.
    pub async fn lineage(
        pool: &PgPool,
        kind: ReferenceKind,
        id: DbId,
    ) -> Result<Option<Vec<DbId>>, sqlx::Error> {
        let mut ancestors = Vec::new();
        let mut current = (kind, id);

        loop {
            let (level, level_id) = current;
            let table = level.table();
            let (Some(column), Some(parent_kind)) = (level.parent_column(), level.parent()) else {
                let query = format!("SELECT id FROM {table} WHERE id = $1");
                let found: Option<DbId> = sqlx::query_scalar(&query)
                    .bind(level_id)
                    .fetch_optional(pool)
                    .await?;
                if found.is_none() {
                    return Ok(None);
                }
                break;
            };

            let query = format!("SELECT {column} FROM {table} WHERE id = $1");
            let parent: Option<Option<DbId>> = sqlx::query_scalar(&query)
                .bind(level_id)
                .fetch_optional(pool)
                .await?;
            match parent {
                None => return Ok(None),
                Some(None) => break,
                Some(Some(parent_id)) => {
                    ancestors.push(parent_id);
                    current = (parent_kind, parent_id);
                }
            }
        }

        ancestors.reverse();
        Ok(Some(ancestors))
    }
}

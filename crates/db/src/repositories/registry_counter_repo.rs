//! Repository for the `registry_counters` table.
//!
//! Each scope (one per seizure kind) owns a monotonically increasing
//! counter. [`RegistryCounterRepo::next_value`] is a single upsert, so two
//! concurrent transactions serialize on the scope row and never share a
//! number.

use sqlx::{PgConnection, PgPool};

pub struct RegistryCounterRepo;

impl RegistryCounterRepo {
    /// Advance the counter for `scope` and return the new value. The first
    /// call for a scope returns 1.
    ///
    /// Takes a connection so callers can run it inside the transaction that
    /// stores the numbered row; a rollback then releases the number.
    pub async fn next_value(conn: &mut PgConnection, scope: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO registry_counters (scope, last_value) VALUES ($1, 1) \
             ON CONFLICT (scope) DO UPDATE \
                SET last_value = registry_counters.last_value + 1 \
             RETURNING last_value",
        )
        .bind(scope)
        .fetch_one(conn)
        .await
    }

    /// Last value handed out for `scope`, if any.
    pub async fn current(pool: &PgPool, scope: &str) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar("SELECT last_value FROM registry_counters WHERE scope = $1")
            .bind(scope)
            .fetch_optional(pool)
            .await
    }
}

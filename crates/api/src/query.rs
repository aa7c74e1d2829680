//! Shared query parameter types for API handlers.

use serde::Deserialize;
use sirpol_core::types::DbId;

/// Generic pagination parameters (`?limit=&offset=`). Values are clamped
/// with `clamp_limit` / `clamp_offset` before reaching a repository.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?parent_id=` for children lookups.
#[derive(Debug, Deserialize)]
pub struct ParentParams {
    pub parent_id: Option<DbId>,
}

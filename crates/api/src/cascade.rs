//! Database-backed cascade checks.
//!
//! Loads the stored ancestry of each submitted level and hands it to
//! [`sirpol_core::hierarchy::check_chain`].

use sirpol_core::hierarchy::{check_chain, unknown_selection, Chain, ResolvedLevel};
use sirpol_core::types::DbId;
use sirpol_db::repositories::HierarchyRepo;
use sirpol_db::DbPool;

use crate::error::AppResult;

/// Verify that the ids submitted for `chain` exist and nest correctly.
///
/// `submitted` holds one optional id per chain level, outer level first.
pub async fn verify_chain(
    pool: &DbPool,
    chain: &Chain,
    submitted: &[Option<DbId>],
) -> AppResult<()> {
    let mut resolved = Vec::with_capacity(submitted.len());
    for (level, id) in chain.levels.iter().zip(submitted) {
        let Some(id) = *id else {
            resolved.push(ResolvedLevel::unselected());
            continue;
        };
        let ancestors = HierarchyRepo::lineage(pool, level.kind, id)
            .await?
            .ok_or_else(|| unknown_selection(level, id))?;
        resolved.push(ResolvedLevel::selected(id, ancestors));
    }

    check_chain(chain, &resolved)?;
    Ok(())
}

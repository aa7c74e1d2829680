//! Handlers for the reference catalog: territorial divisions, crime
//! taxonomy, police organization and the small lookup tables.
//!
//! Every table shares the same shape, so one set of handlers serves all of
//! them, keyed by the `{kind}` path segment.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use sirpol_core::error::CoreError;
use sirpol_core::reference::{require_parent_id, CascadeFilter, ReferenceKind};
use sirpol_core::search::{
    build_like_pattern, clamp_limit, clamp_offset, NameOrdering, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use sirpol_core::types::DbId;
use sirpol_db::models::reference::{CascadeParams, ReferenceListParams};
use sirpol_db::repositories::ReferenceRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::input::{AppPath, AppQuery};
use crate::query::ParentParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn resolve_kind(slug: &str) -> AppResult<ReferenceKind> {
    ReferenceKind::from_slug(slug)
        .ok_or_else(|| AppError::NotFound(format!("Unknown reference catalog '{slug}'")))
}

/// GET /api/v1/reference/{kind}
///
/// Supports `search`, `ordering` (`name` / `-name`), `parent_id` or the
/// kind's named parent parameter, `limit` and `offset`.
pub async fn list_items(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
    AppQuery(params): AppQuery<ReferenceListParams>,
) -> AppResult<impl IntoResponse> {
    let kind = resolve_kind(&slug)?;
    let ordering = NameOrdering::parse(params.ordering.as_deref())?;
    let pattern = params.search.as_deref().and_then(build_like_pattern);
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);

    let items = ReferenceRepo::list(
        &state.pool,
        kind,
        pattern.as_deref(),
        params.parent_filter(kind),
        ordering,
        limit,
        offset,
    )
    .await?;

    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/reference/{kind}/{id}
pub async fn get_item(
    State(state): State<AppState>,
    AppPath((slug, id)): AppPath<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let kind = resolve_kind(&slug)?;
    let item = ReferenceRepo::find_by_id(&state.pool, kind, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: kind.entity_name(),
            id,
        }))?;
    Ok(Json(DataResponse { data: item }))
}

/// GET /api/v1/reference/{kind}/by-parent?parent_id=
pub async fn list_by_parent(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
    AppQuery(params): AppQuery<ParentParams>,
) -> AppResult<impl IntoResponse> {
    let kind = resolve_kind(&slug)?;
    let parent_id = require_parent_id(kind, params.parent_id)?;
    let items = ReferenceRepo::children(&state.pool, kind, parent_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/reference/cascade?type=&parent_id=
pub async fn cascade(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<CascadeParams>,
) -> AppResult<impl IntoResponse> {
    let filter = CascadeFilter::parse(params.filter.as_deref())?;
    let kind = filter.child_kind();
    let parent_id = params
        .parent_id
        .ok_or_else(|| CoreError::Validation("Parameter 'parent_id' is required".into()))?;
    let items = ReferenceRepo::children(&state.pool, kind, parent_id).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// Shortcuts
// ---------------------------------------------------------------------------

async fn children_by_named_param(
    state: &AppState,
    kind: ReferenceKind,
    params: &ReferenceListParams,
) -> AppResult<impl IntoResponse> {
    let parent_id = require_parent_id(kind, params.parent_filter(kind))?;
    let items = ReferenceRepo::children(&state.pool, kind, parent_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/provinces?departamento_id=
pub async fn provinces_of_department(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ReferenceListParams>,
) -> AppResult<impl IntoResponse> {
    children_by_named_param(&state, ReferenceKind::Provinces, &params).await
}

/// GET /api/v1/districts?provincia_id=
pub async fn districts_of_province(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ReferenceListParams>,
) -> AppResult<impl IntoResponse> {
    children_by_named_param(&state, ReferenceKind::Districts, &params).await
}

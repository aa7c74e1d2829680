//! Handlers for the drug-seizure registry.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sirpol_core::drug_seizure::{normalize_intervention, validate_quantity, SeizureKind};
use sirpol_core::error::CoreError;
use sirpol_core::hierarchy::{LOCATION_CHAIN, POLICE_CHAIN};
use sirpol_core::search::{
    clamp_limit, clamp_offset, validate_date_range, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use sirpol_core::types::DbId;
use sirpol_db::models::drug_seizure::{CreateDrugSeizure, DrugSeizureListParams};
use sirpol_db::repositories::DrugSeizureRepo;
use validator::Validate;

use crate::cascade::verify_chain;
use crate::error::{AppError, AppResult};
use crate::middleware::actor::Actor;
use crate::middleware::input::{AppJson, AppPath, AppQuery};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/drug-seizures
///
/// The registry number is assigned from the per-kind counter in the same
/// transaction as the insert.
pub async fn create_seizure(
    actor: Actor,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateDrugSeizure>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(CoreError::from)?;

    let kind = SeizureKind::parse(&input.kind)?;
    let intervention = normalize_intervention(&input.intervention_type)?;
    validate_quantity(kind, input.quantity_units, input.quantity_kg)?;

    verify_seizure_chains(&state, &input).await?;

    let seizure =
        DrugSeizureRepo::create(&state.pool, kind, intervention, &input, &actor.name).await?;

    tracing::info!(
        seizure_id = seizure.id,
        kind = kind.as_str(),
        registry_number = seizure.registry_number,
        recorded_by = %actor.name,
        "Drug seizure recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: seizure })))
}

/// PUT /api/v1/drug-seizures/{id}
///
/// Full replacement with the create payload. `kind` must match the stored
/// record; the registry number never changes.
pub async fn update_seizure(
    actor: Actor,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<CreateDrugSeizure>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(CoreError::from)?;

    let current = DrugSeizureRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DrugSeizure",
            id,
        }))?;
    let kind = SeizureKind::parse(&input.kind)?;
    if kind.as_str() != current.kind {
        return Err(AppError::Core(CoreError::Validation(format!(
            "kind: a seizure cannot move from '{}' to '{}'",
            current.kind, input.kind
        ))));
    }
    let intervention = normalize_intervention(&input.intervention_type)?;
    validate_quantity(kind, input.quantity_units, input.quantity_kg)?;
    verify_seizure_chains(&state, &input).await?;

    let seizure =
        DrugSeizureRepo::update(&state.pool, id, kind, intervention, &input, &actor.name)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "DrugSeizure",
                id,
            }))?;

    tracing::info!(
        seizure_id = id,
        kind = kind.as_str(),
        updated_by = %actor.name,
        "Drug seizure updated",
    );

    Ok(Json(DataResponse { data: seizure }))
}

/// GET /api/v1/drug-seizures
///
/// Filters: `kind`, `date_from`, `date_to`, `department_id`.
pub async fn list_seizures(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<DrugSeizureListParams>,
) -> AppResult<impl IntoResponse> {
    let kind = params.kind.as_deref().map(SeizureKind::parse).transpose()?;
    validate_date_range(params.date_from, params.date_to)?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);

    let items = DrugSeizureRepo::list(&state.pool, kind, &params, limit, offset).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/drug-seizures/{id}
pub async fn get_seizure(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let seizure = DrugSeizureRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DrugSeizure",
            id,
        }))?;
    Ok(Json(DataResponse { data: seizure }))
}

/// DELETE /api/v1/drug-seizures/{id}
pub async fn delete_seizure(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let deleted = DrugSeizureRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "DrugSeizure",
            id,
        }));
    }
    tracing::info!(seizure_id = id, "Drug seizure deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Location and police hierarchy checks shared by create and update.
async fn verify_seizure_chains(state: &AppState, input: &CreateDrugSeizure) -> AppResult<()> {
    verify_chain(
        &state.pool,
        &LOCATION_CHAIN,
        &[
            Some(input.department_id),
            Some(input.province_id),
            Some(input.district_id),
        ],
    )
    .await?;
    verify_chain(
        &state.pool,
        &POLICE_CHAIN,
        &[Some(input.directorate_id), input.specialized_directorate_id],
    )
    .await?;
    Ok(())
}

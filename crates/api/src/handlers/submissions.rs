//! Handlers for form submissions.
//!
//! A submission arrives as one flat payload and is stored as a header row
//! plus satellite rows (person, location, crimes, unit and the
//! template-specific extension), all written in a single transaction. An
//! edit replaces every satellite the same way.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sirpol_core::error::CoreError;
use sirpol_core::hierarchy::{CRIME_CHAIN, LOCATION_CHAIN};
use sirpol_core::search::{
    clamp_limit, clamp_offset, validate_date_range, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use sirpol_core::submission::{
    check_person, ensure_editable, ensure_same_template, generate_submission_number, parse_sex,
    resolve_extension, validate_status, validate_transition, TemplateExtension, TemplateKind,
};
use sirpol_core::types::DbId;
use sirpol_db::models::submission::{CreateSubmission, SubmissionListParams, UpdateSubmissionStatus};
use sirpol_db::repositories::{SubmissionRepo, TemplateRepo};
use validator::Validate;

use crate::cascade::verify_chain;
use crate::error::{AppError, AppResult};
use crate::middleware::actor::Actor;
use crate::middleware::input::{AppJson, AppPath, AppQuery};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Template, cross-field and hierarchy checks shared by create and update.
/// Returns the template name and the extension to write.
async fn check_payload(
    state: &AppState,
    input: &CreateSubmission,
) -> AppResult<(String, TemplateExtension)> {
    input.validate().map_err(CoreError::from)?;

    let template = TemplateRepo::find_by_id(&state.pool, input.template_id)
        .await?
        .filter(|t| t.is_active)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "template_id: template {} does not exist or is inactive",
                input.template_id
            ))
        })?;
    let kind = TemplateKind::parse(&template.kind)?;

    check_person(kind, &input.person)?;
    let extension = resolve_extension(kind, &input.requisition, &input.detention)?;

    verify_chain(&state.pool, &LOCATION_CHAIN, &input.location.levels()).await?;
    for crime in input.crimes() {
        verify_chain(&state.pool, &CRIME_CHAIN, &crime.levels()).await?;
    }

    Ok((template.name, extension))
}

/// POST /api/v1/submissions
pub async fn create_submission(
    actor: Actor,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateSubmission>,
) -> AppResult<impl IntoResponse> {
    let (template_name, extension) = check_payload(&state, &input).await?;

    let number = generate_submission_number(&template_name);
    let new = input.into_new(&actor.name, number, extension);
    let submission = SubmissionRepo::create_aggregate(&state.pool, &new).await?;

    tracing::info!(
        submission_id = submission.id,
        submission_number = %submission.submission_number,
        template = %template_name,
        submitted_by = %actor.name,
        "Form submission created",
    );

    let detail = SubmissionRepo::find_detail(&state.pool, submission.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FormSubmission",
            id: submission.id,
        }))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// PUT /api/v1/submissions/{id}
///
/// Full replacement with the create payload. The template, submission
/// number, author and status are kept; approved submissions are final.
pub async fn update_submission(
    actor: Actor,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<CreateSubmission>,
) -> AppResult<impl IntoResponse> {
    let current = SubmissionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FormSubmission",
            id,
        }))?;
    ensure_editable(id, &current.status)?;
    ensure_same_template(current.template_id, input.template_id)?;

    let (_, extension) = check_payload(&state, &input).await?;

    let new = input.into_new(&current.submitted_by, current.submission_number, extension);
    SubmissionRepo::replace_aggregate(&state.pool, id, &new, &actor.name)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict(format!(
                "Submission {id} was approved or removed concurrently; reload and retry"
            ))
        })?;

    tracing::info!(
        submission_id = id,
        updated_by = %actor.name,
        "Form submission updated",
    );

    let detail = SubmissionRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FormSubmission",
            id,
        }))?;

    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/v1/submissions
///
/// Filters: `status`, `template_id`, `search`, `document_number`,
/// `organized_crime_name`, `sex`, `department_id`, `province_id`,
/// `district_id`, `date_from`, `date_to`.
pub async fn list_submissions(
    State(state): State<AppState>,
    AppQuery(mut params): AppQuery<SubmissionListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_status(status)?;
    }
    params.sex = normalize_sex(params.sex.as_deref())?;
    validate_date_range(params.date_from, params.date_to)?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);

    let items = SubmissionRepo::list(&state.pool, &params, limit, offset).await?;

    Ok(Json(DataResponse { data: items }))
}

/// Blank means no filter.
pub(crate) fn normalize_sex(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| parse_sex(s).map(str::to_string))
        .transpose()
}

/// GET /api/v1/submissions/{id}
///
/// Returns the submission with all of its satellite rows.
pub async fn get_submission(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = SubmissionRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FormSubmission",
            id,
        }))?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// Status / delete
// ---------------------------------------------------------------------------

/// PUT /api/v1/submissions/{id}/status
///
/// Moves the submission one step along `draft -> submitted -> reviewed ->
/// approved`.
pub async fn update_status(
    actor: Actor,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateSubmissionStatus>,
) -> AppResult<impl IntoResponse> {
    validate_status(&input.status)?;

    let current = SubmissionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FormSubmission",
            id,
        }))?;
    validate_transition(&current.status, &input.status)?;

    let updated = SubmissionRepo::update_status(&state.pool, id, &current.status, &input.status)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict(format!(
                "Submission {id} changed status concurrently; reload and retry"
            ))
        })?;

    tracing::info!(
        submission_id = id,
        from = %current.status,
        to = %updated.status,
        actor = %actor.name,
        "Submission status changed",
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/submissions/{id}
pub async fn delete_submission(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let deleted = SubmissionRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "FormSubmission",
            id,
        }));
    }
    tracing::info!(submission_id = id, "Form submission deleted");
    Ok(StatusCode::NO_CONTENT)
}

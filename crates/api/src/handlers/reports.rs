//! Report handlers: drug-seizure summary and ranking, person statistics.
//!
//! Query failures here are reported as `REPORT_ERROR` with the underlying
//! message so report consumers can tell what went wrong.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use sirpol_core::drug_seizure::{
    build_summary, AppliedFilters, RankingDimension, DEFAULT_RANKING_LIMIT, MAX_RANKING_LIMIT,
};
use sirpol_core::search::{clamp_limit, validate_date_range};
use sirpol_core::submission::{build_person_statistics, TOP_NATIONALITIES};
use sirpol_db::models::drug_seizure::{RankingEntry, RankingParams, SummaryParams};
use sirpol_db::models::submission::PersonFilters;
use sirpol_db::repositories::{DrugSeizureRepo, SubmissionRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::submissions::normalize_sex;
use crate::middleware::input::AppQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// Ranking report body.
#[derive(Debug, Serialize)]
pub struct RankingReport {
    pub by: &'static str,
    pub items: Vec<RankingEntry>,
}

fn report_error(err: sqlx::Error) -> AppError {
    AppError::Report(err.to_string())
}

/// GET /api/v1/reports/drug-seizures/summary
pub async fn seizure_summary(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SummaryParams>,
) -> AppResult<impl IntoResponse> {
    validate_date_range(params.date_from, params.date_to)?;

    let totals = DrugSeizureRepo::kind_totals(&state.pool, &params)
        .await
        .map_err(report_error)?;
    let interventions = DrugSeizureRepo::intervention_counts(&state.pool, &params)
        .await
        .map_err(report_error)?;

    let summary = build_summary(
        &totals,
        &interventions,
        AppliedFilters {
            date_from: params.date_from,
            date_to: params.date_to,
            department_id: params.department_id,
        },
    );

    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/reports/drug-seizures/ranking
///
/// `by` is `department` or `unit`; `limit` defaults to 10.
pub async fn seizure_ranking(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<RankingParams>,
) -> AppResult<impl IntoResponse> {
    let dimension = RankingDimension::parse(params.by.as_deref())?;
    validate_date_range(params.date_from, params.date_to)?;
    let limit = clamp_limit(params.limit, DEFAULT_RANKING_LIMIT, MAX_RANKING_LIMIT);

    let items =
        DrugSeizureRepo::ranking(&state.pool, dimension, params.date_from, params.date_to, limit)
            .await
            .map_err(report_error)?;

    Ok(Json(DataResponse {
        data: RankingReport {
            by: dimension.as_str(),
            items,
        },
    }))
}

/// GET /api/v1/reports/submissions/persons
///
/// Counts by sex, average age and the most frequent nationalities of the
/// persons on submissions. Accepts the person filters of the submission
/// list.
pub async fn person_statistics(
    State(state): State<AppState>,
    AppQuery(mut filters): AppQuery<PersonFilters>,
) -> AppResult<impl IntoResponse> {
    filters.sex = normalize_sex(filters.sex.as_deref())?;
    validate_date_range(filters.date_from, filters.date_to)?;

    let by_sex = SubmissionRepo::person_counts_by_sex(&state.pool, &filters)
        .await
        .map_err(report_error)?;
    let average_age = SubmissionRepo::person_average_age(&state.pool, &filters)
        .await
        .map_err(report_error)?;
    let nationalities = SubmissionRepo::top_nationalities(&state.pool, &filters, TOP_NATIONALITIES)
        .await
        .map_err(report_error)?;

    Ok(Json(DataResponse {
        data: build_person_statistics(&by_sex, average_age, nationalities),
    }))
}

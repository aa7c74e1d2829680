use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use sirpol_db::repositories::TemplateRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/templates
///
/// Active form templates, ordered by name.
pub async fn list_templates(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let templates = TemplateRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: templates }))
}

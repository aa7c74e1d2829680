use axum::routing::{get, put};
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Form submission routes mounted at `/submissions`.
///
/// ```text
/// GET    /                  -> list_submissions
/// POST   /                  -> create_submission
/// GET    /{id}              -> get_submission
/// PUT    /{id}              -> update_submission
/// DELETE /{id}              -> delete_submission
/// PUT    /{id}/status       -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(submissions::list_submissions).post(submissions::create_submission),
        )
        .route(
            "/{id}",
            get(submissions::get_submission)
                .put(submissions::update_submission)
                .delete(submissions::delete_submission),
        )
        .route("/{id}/status", put(submissions::update_status))
}

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::incidents;
use crate::state::AppState;

/// Incident routes mounted at `/incidents`.
///
/// ```text
/// GET    /                  -> list_incidents
/// POST   /upload            -> upload_incidents
/// DELETE /delete-batch      -> delete_incidents
/// GET    /batches           -> list_batches
/// DELETE /batches/{id}      -> delete_batch
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(incidents::list_incidents))
        .route("/upload", post(incidents::upload_incidents))
        .route("/delete-batch", delete(incidents::delete_incidents))
        .route("/batches", get(incidents::list_batches))
        .route("/batches/{id}", delete(incidents::delete_batch))
}

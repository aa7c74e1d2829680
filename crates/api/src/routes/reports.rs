use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Report routes mounted at `/reports`.
///
/// ```text
/// GET /drug-seizures/summary    -> seizure_summary
/// GET /drug-seizures/ranking    -> seizure_ranking
/// GET /submissions/persons      -> person_statistics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/drug-seizures/summary", get(reports::seizure_summary))
        .route("/drug-seizures/ranking", get(reports::seizure_ranking))
        .route("/submissions/persons", get(reports::person_statistics))
}

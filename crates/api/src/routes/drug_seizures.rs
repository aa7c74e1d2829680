use axum::routing::get;
use axum::Router;

use crate::handlers::drug_seizures;
use crate::state::AppState;

/// Drug-seizure routes mounted at `/drug-seizures`.
///
/// ```text
/// GET    /                  -> list_seizures
/// POST   /                  -> create_seizure
/// GET    /{id}              -> get_seizure
/// PUT    /{id}              -> update_seizure
/// DELETE /{id}              -> delete_seizure
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(drug_seizures::list_seizures).post(drug_seizures::create_seizure),
        )
        .route(
            "/{id}",
            get(drug_seizures::get_seizure)
                .put(drug_seizures::update_seizure)
                .delete(drug_seizures::delete_seizure),
        )
}

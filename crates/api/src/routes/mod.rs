pub mod drug_seizures;
pub mod health;
pub mod incidents;
pub mod reference;
pub mod reports;
pub mod submissions;
pub mod templates;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /incidents                                       list
/// /incidents/upload                                spreadsheet import (POST)
/// /incidents/delete-batch                          delete by ids (DELETE)
/// /incidents/batches                               list import batches
/// /incidents/batches/{id}                          delete batch (DELETE)
///
/// /reference/cascade                               cascade filter
/// /reference/{kind}                                list, search
/// /reference/{kind}/by-parent                      children of parent
/// /reference/{kind}/{id}                           get
/// /provinces                                       provinces of ?departamento_id
/// /districts                                       districts of ?provincia_id
///
/// /templates                                       active templates
///
/// /submissions                                     list, search, create
/// /submissions/{id}                                get, replace (PUT), delete
/// /submissions/{id}/status                         status transition (PUT)
///
/// /drug-seizures                                   list, create
/// /drug-seizures/{id}                              get, replace (PUT), delete
///
/// /reports/drug-seizures/summary                   consolidated statistics
/// /reports/drug-seizures/ranking                   ranking by department or unit
/// /reports/submissions/persons                     person statistics
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/incidents", incidents::router())
        .nest("/reference", reference::router())
        .route(
            "/provinces",
            get(handlers::reference::provinces_of_department),
        )
        .route("/districts", get(handlers::reference::districts_of_province))
        .nest("/templates", templates::router())
        .nest("/submissions", submissions::router())
        .nest("/drug-seizures", drug_seizures::router())
        .nest("/reports", reports::router())
}

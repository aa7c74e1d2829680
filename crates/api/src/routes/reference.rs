//! Reference catalog routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::reference;
use crate::state::AppState;

/// Routes mounted at `/reference`.
///
/// ```text
/// GET /cascade              -> cascade
/// GET /{kind}               -> list_items
/// GET /{kind}/by-parent     -> list_by_parent
/// GET /{kind}/{id}          -> get_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cascade", get(reference::cascade))
        .route("/{kind}", get(reference::list_items))
        .route("/{kind}/by-parent", get(reference::list_by_parent))
        .route("/{kind}/{id}", get(reference::get_item))
}

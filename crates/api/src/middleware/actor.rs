//! Acting-user extractor.
//!
//! Authentication happens upstream; this service only records who acted.
//! The gateway forwards the user name in the `X-User` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sirpol_core::error::CoreError;

use crate::error::AppError;

/// Header carrying the acting user's name.
pub const ACTOR_HEADER: &str = "x-user";

/// Longest user name the audit columns accept.
pub const MAX_ACTOR_LEN: usize = 150;

/// The user on whose behalf a write is made.
///
/// ```ignore
/// async fn my_handler(actor: Actor) -> AppResult<Json<()>> {
///     tracing::info!(actor = %actor.name, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Actor {
    pub name: String,
}

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing X-User header".into()))
            })?;

        if name.chars().count() > MAX_ACTOR_LEN {
            return Err(AppError::BadRequest(format!(
                "X-User must be at most {MAX_ACTOR_LEN} characters"
            )));
        }

        Ok(Actor {
            name: name.to_string(),
        })
    }
}

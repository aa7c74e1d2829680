//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate persistence to the repositories in `sirpol_db`, domain
//! rules to `sirpol_core`, and map errors via [`AppError`](crate::error::AppError).

pub mod drug_seizures;
pub mod incidents;
pub mod reference;
pub mod reports;
pub mod submissions;
pub mod templates;

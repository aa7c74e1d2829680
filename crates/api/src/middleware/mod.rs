//! Request extractors shared by handlers.
//!
//! - [`actor::Actor`] -- The acting user named by the `X-User` header.
//! - [`input`] -- Body, query and path extractors with JSON rejections.

pub mod actor;
pub mod input;

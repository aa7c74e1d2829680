//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and list filters

pub mod drug_seizure;
pub mod import_batch;
pub mod incident;
pub mod reference;
pub mod submission;
pub mod template;

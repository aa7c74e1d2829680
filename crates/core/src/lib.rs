//! Domain logic for the SIRPOL records backend.
//!
//! Everything in this crate is pure: no database access and no HTTP. The
//! `sirpol-db` and `sirpol-api` crates call into these modules for
//! validation rules, status transitions, spreadsheet row mapping and report
//! assembly.

pub mod drug_seizure;
pub mod error;
pub mod hierarchy;
pub mod incident_import;
pub mod reference;
pub mod search;
pub mod spreadsheet;
pub mod submission;
pub mod types;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod drug_seizure_repo;
pub mod hierarchy_repo;
pub mod import_batch_repo;
pub mod incident_repo;
pub mod reference_repo;
pub mod registry_counter_repo;
pub mod submission_repo;
pub mod template_repo;

pub use drug_seizure_repo::DrugSeizureRepo;
pub use hierarchy_repo::HierarchyRepo;
pub use import_batch_repo::ImportBatchRepo;
pub use incident_repo::IncidentRepo;
pub use reference_repo::ReferenceRepo;
pub use registry_counter_repo::RegistryCounterRepo;
pub use submission_repo::SubmissionRepo;
pub use template_repo::TemplateRepo;

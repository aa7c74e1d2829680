//! Detainee form submissions: value structs, template rules and the status
//! state machine.
//!
//! A submission payload is composed from the value structs below (person,
//! location, crime, unit and the template extensions). The API flattens them
//! into a single JSON object; the assembler in `sirpol-db` splits them back
//! into one row per satellite table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Initial status of every new submission.
pub const STATUS_DRAFT: &str = "draft";
/// The author has sent the form for review.
pub const STATUS_SUBMITTED: &str = "submitted";
/// A reviewer has checked the form.
pub const STATUS_REVIEWED: &str = "reviewed";
/// Final, approved record.
pub const STATUS_APPROVED: &str = "approved";

/// All valid submission statuses, in lifecycle order.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_SUBMITTED,
    STATUS_REVIEWED,
    STATUS_APPROVED,
];

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from_status` may transition to.
///
/// The lifecycle is strictly linear:
/// - `draft`     -> `submitted`
/// - `submitted` -> `reviewed`
/// - `reviewed`  -> `approved`
/// - `approved`  -> (terminal)
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_DRAFT => &[STATUS_SUBMITTED],
        STATUS_SUBMITTED => &[STATUS_REVIEWED],
        STATUS_REVIEWED => &[STATUS_APPROVED],
        _ => &[],
    }
}

/// Validate that a status transition from `current` to `next` is allowed.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition submission from '{current}' to '{next}'. Allowed transitions: {allowed:?}"
        )))
    }
}

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid submission status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// Approved submissions are final; every earlier status may still be edited.
pub fn ensure_editable(id: DbId, status: &str) -> Result<(), CoreError> {
    if status == STATUS_APPROVED {
        return Err(CoreError::Conflict(format!(
            "Submission {id} is approved and can no longer be edited"
        )));
    }
    Ok(())
}

/// A submission keeps the template it was created with.
pub fn ensure_same_template(current: DbId, requested: DbId) -> Result<(), CoreError> {
    if current != requested {
        return Err(CoreError::Validation(format!(
            "template_id: a submission cannot move from template {current} to {requested}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Which template-specific satellite a form template carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// `RQ`: capture of a person with an outstanding requisitoria.
    Requisition,
    /// `Diversos Delitos`: adult detention.
    Detention,
    /// `Menores`: detention of a minor.
    MinorDetention,
}

impl TemplateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requisition => "requisition",
            Self::Detention => "detention",
            Self::MinorDetention => "minor_detention",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "requisition" => Ok(Self::Requisition),
            "detention" => Ok(Self::Detention),
            "minor_detention" => Ok(Self::MinorDetention),
            other => Err(CoreError::Internal(format!("Unknown template kind '{other}'"))),
        }
    }
}

/// Age limit (exclusive) for the minors template.
pub const MINOR_AGE_LIMIT: i32 = 18;

pub const MOTIVE_FLAGRANCY: &str = "flagrancia";
pub const MOTIVE_PRELIMINARY: &str = "detencion_preliminar";

/// Accepted detention motives.
pub const VALID_MOTIVES: &[&str] = &[MOTIVE_FLAGRANCY, MOTIVE_PRELIMINARY];

/// Build a human-readable submission number: `"{TEMPLATE}-{8 hex chars}"`.
pub fn generate_submission_number(template_name: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("{template_name}-{suffix}")
}

// ---------------------------------------------------------------------------
// Value structs
// ---------------------------------------------------------------------------

fn default_nationality() -> String {
    "Peruana".to_string()
}

fn validate_document_number(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < 3 {
        let mut err = ValidationError::new("document_number");
        err.message = Some("document number must have at least 3 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Detained person.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct PersonData {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub paternal_surname: String,
    #[validate(length(max = 100))]
    pub maternal_surname: Option<String>,
    #[validate(range(min = 0, max = 120))]
    pub age: i32,
    pub sex: String,
    pub document_type_id: Option<DbId>,
    #[validate(length(max = 20), custom(function = "validate_document_number"))]
    pub document_number: String,
    #[serde(default = "default_nationality")]
    #[validate(length(min = 1, max = 50))]
    pub nationality: String,
    /// Member of an organized-crime band (BBCC/OOCC).
    #[serde(default)]
    pub organized_crime_member: bool,
    #[validate(length(max = 200))]
    pub organized_crime_name: Option<String>,
}

/// Where the detention happened. Only the district is stored; the outer
/// levels are submitted for the cascade check.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LocationSelection {
    pub department_id: Option<DbId>,
    pub province_id: Option<DbId>,
    pub district_id: DbId,
}

impl LocationSelection {
    /// Submitted ids in chain order, outer first.
    pub fn levels(&self) -> [Option<DbId>; 3] {
        [self.department_id, self.province_id, Some(self.district_id)]
    }
}

/// A crime selection down to its subtype.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CrimeSelection {
    pub crime_jurisdiction_id: Option<DbId>,
    pub crime_general_id: Option<DbId>,
    pub crime_specific_id: Option<DbId>,
    pub crime_subtype_id: DbId,
    #[serde(default)]
    pub is_attempt: bool,
    #[serde(default)]
    pub multiple_crimes: bool,
    #[validate(length(max = 2000))]
    pub other_crimes: Option<String>,
}

impl CrimeSelection {
    /// Submitted ids in chain order, outer first.
    pub fn levels(&self) -> [Option<DbId>; 4] {
        [
            self.crime_jurisdiction_id,
            self.crime_general_id,
            self.crime_specific_id,
            Some(self.crime_subtype_id),
        ]
    }
}

/// Police unit that carried out the detention, stored as text.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UnitData {
    #[validate(length(max = 200))]
    pub specialized_directorate: Option<String>,
    #[validate(length(max = 200))]
    pub division: Option<String>,
    #[validate(length(max = 200))]
    pub police_department: Option<String>,
    #[validate(length(max = 200))]
    pub unit_name: Option<String>,
}

/// Fields that only apply to the `RQ` template.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RequisitionData {
    pub capture_order_authority: Option<String>,
    #[serde(default)]
    pub most_wanted: bool,
}

/// Fields that only apply to the detention templates.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DetentionData {
    pub detention_motive: Option<String>,
}

/// The template-specific satellite to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateExtension {
    Requisition {
        capture_order_authority: String,
        most_wanted: bool,
    },
    Detention {
        motive: String,
    },
}

// ---------------------------------------------------------------------------
// Cross-field validation
// ---------------------------------------------------------------------------

/// Parse a `sex` filter value; accepts either case.
pub fn parse_sex(raw: &str) -> Result<&'static str, CoreError> {
    match raw.trim() {
        "M" | "m" => Ok("M"),
        "F" | "f" => Ok("F"),
        other => Err(CoreError::Validation(format!(
            "sex: must be 'M' or 'F', got '{other}'"
        ))),
    }
}

/// Person rules that `validator` attributes cannot express.
pub fn check_person(kind: TemplateKind, person: &PersonData) -> Result<(), CoreError> {
    if person.sex != "M" && person.sex != "F" {
        return Err(CoreError::Validation(format!(
            "sex: must be 'M' or 'F', got '{}'",
            person.sex
        )));
    }
    if person.organized_crime_member
        && person
            .organized_crime_name
            .as_deref()
            .map_or(true, |name| name.trim().is_empty())
    {
        return Err(CoreError::Validation(
            "organized_crime_name: required when the person belongs to an organized-crime band"
                .into(),
        ));
    }
    if kind == TemplateKind::MinorDetention && person.age >= MINOR_AGE_LIMIT {
        return Err(CoreError::Validation(format!(
            "age: the minors template requires an age below {MINOR_AGE_LIMIT}, got {}",
            person.age
        )));
    }
    Ok(())
}

/// Pick the template-specific satellite, rejecting payloads that lack the
/// fields their template needs.
pub fn resolve_extension(
    kind: TemplateKind,
    requisition: &RequisitionData,
    detention: &DetentionData,
) -> Result<TemplateExtension, CoreError> {
    match kind {
        TemplateKind::Requisition => {
            let authority = requisition
                .capture_order_authority
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    CoreError::Validation(
                        "capture_order_authority: required for the requisition template".into(),
                    )
                })?;
            Ok(TemplateExtension::Requisition {
                capture_order_authority: authority.to_string(),
                most_wanted: requisition.most_wanted,
            })
        }
        TemplateKind::Detention | TemplateKind::MinorDetention => {
            let motive = detention
                .detention_motive
                .as_deref()
                .map(str::trim)
                .ok_or_else(|| {
                    CoreError::Validation(
                        "detention_motive: required for detention templates".into(),
                    )
                })?;
            if !VALID_MOTIVES.contains(&motive) {
                return Err(CoreError::Validation(format!(
                    "detention_motive: must be one of {VALID_MOTIVES:?}, got '{motive}'"
                )));
            }
            Ok(TemplateExtension::Detention {
                motive: motive.to_string(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Person statistics
// ---------------------------------------------------------------------------

/// Number of nationalities listed in the person statistics report.
pub const TOP_NATIONALITIES: i64 = 10;

/// Count of detainees sharing one nationality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalityCount {
    pub nationality: String,
    pub total: i64,
}

/// Aggregate view over the persons recorded on submissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonStatistics {
    pub total_persons: i64,
    pub by_sex: BTreeMap<String, i64>,
    /// Rounded to one decimal; `None` when no person matched.
    pub average_age: Option<f64>,
    pub top_nationalities: Vec<NationalityCount>,
}

/// Assemble the report from the raw aggregates. `nationalities` is expected
/// in descending count order.
pub fn build_person_statistics(
    by_sex: &[(String, i64)],
    average_age: Option<f64>,
    nationalities: Vec<(String, i64)>,
) -> PersonStatistics {
    let by_sex: BTreeMap<String, i64> = by_sex.iter().cloned().collect();
    PersonStatistics {
        total_persons: by_sex.values().sum(),
        by_sex,
        average_age: average_age.map(|avg| (avg * 10.0).round() / 10.0),
        top_nationalities: nationalities
            .into_iter()
            .map(|(nationality, total)| NationalityCount { nationality, total })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

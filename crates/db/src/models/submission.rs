//! Form submission models: one row type per satellite table, the aggregate
//! returned by `GET /submissions/{id}`, and the create payload.

use serde::{Deserialize, Serialize};
use sirpol_core::submission::{
    CrimeSelection, DetentionData, LocationSelection, PersonData, RequisitionData,
    TemplateExtension, UnitData,
};
use sirpol_core::types::{Date, DbId, Time, Timestamp};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A row from the `form_submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormSubmission {
    pub id: DbId,
    pub template_id: DbId,
    pub submitted_by: String,
    pub submission_number: String,
    pub detention_date: Date,
    pub detention_time: Time,
    pub sicpip_note: Option<String>,
    pub status: String,
    pub updated_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionPerson {
    pub id: DbId,
    pub submission_id: DbId,
    pub first_name: String,
    pub paternal_surname: String,
    pub maternal_surname: Option<String>,
    pub age: i32,
    pub sex: String,
    pub document_type_id: Option<DbId>,
    pub document_number: String,
    pub nationality: String,
    pub organized_crime_member: bool,
    pub organized_crime_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionLocation {
    pub id: DbId,
    pub submission_id: DbId,
    pub district_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One crime of a submission. `position` is 1 for the main crime and 2 for
/// the additional one.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionCrime {
    pub id: DbId,
    pub submission_id: DbId,
    pub crime_subtype_id: DbId,
    pub position: i16,
    pub is_attempt: bool,
    pub multiple_crimes: bool,
    pub other_crimes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionUnit {
    pub id: DbId,
    pub submission_id: DbId,
    pub specialized_directorate: Option<String>,
    pub division: Option<String>,
    pub police_department: Option<String>,
    pub unit_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionRequisition {
    pub id: DbId,
    pub submission_id: DbId,
    pub capture_order_authority: String,
    pub most_wanted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionDetention {
    pub id: DbId,
    pub submission_id: DbId,
    pub motive: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Listing entry: the submission plus its template name and person name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionListItem {
    pub id: DbId,
    pub template_id: DbId,
    pub template_name: String,
    pub submitted_by: String,
    pub submission_number: String,
    pub detention_date: Date,
    pub status: String,
    pub person_name: Option<String>,
    pub created_at: Timestamp,
}

/// A submission with every satellite loaded.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub submission: FormSubmission,
    pub template_name: String,
    pub person: Option<SubmissionPerson>,
    pub location: Option<SubmissionLocation>,
    pub crimes: Vec<SubmissionCrime>,
    pub unit: Option<SubmissionUnit>,
    pub requisition: Option<SubmissionRequisition>,
    pub detention: Option<SubmissionDetention>,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Flat JSON payload of `POST /submissions` and `PUT /submissions/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubmission {
    pub template_id: DbId,
    pub detention_date: Date,
    pub detention_time: Time,
    #[validate(length(max = 100))]
    pub sicpip_note: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub person: PersonData,
    #[serde(flatten)]
    pub location: LocationSelection,
    #[serde(flatten)]
    #[validate(nested)]
    pub crime: CrimeSelection,
    /// Optional second crime, nested under its own key.
    #[validate(nested)]
    pub additional_crime: Option<CrimeSelection>,
    #[serde(flatten)]
    #[validate(nested)]
    pub unit: UnitData,
    #[serde(flatten)]
    pub requisition: RequisitionData,
    #[serde(flatten)]
    pub detention: DetentionData,
}

impl CreateSubmission {
    /// Every crime selection, main crime first.
    pub fn crimes(&self) -> impl Iterator<Item = &CrimeSelection> {
        std::iter::once(&self.crime).chain(self.additional_crime.as_ref())
    }

    /// Turn a checked payload into assembler input.
    pub fn into_new(
        self,
        submitted_by: &str,
        submission_number: String,
        extension: TemplateExtension,
    ) -> NewSubmission {
        let mut crimes = vec![self.crime];
        crimes.extend(self.additional_crime);
        NewSubmission {
            template_id: self.template_id,
            submitted_by: submitted_by.to_string(),
            submission_number,
            detention_date: self.detention_date,
            detention_time: self.detention_time,
            sicpip_note: self.sicpip_note,
            person: self.person,
            district_id: self.location.district_id,
            crimes,
            unit: self.unit,
            extension,
        }
    }
}

/// Everything the assembler writes, already validated.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub template_id: DbId,
    pub submitted_by: String,
    pub submission_number: String,
    pub detention_date: Date,
    pub detention_time: Time,
    pub sicpip_note: Option<String>,
    pub person: PersonData,
    pub district_id: DbId,
    pub crimes: Vec<CrimeSelection>,
    pub unit: UnitData,
    pub extension: TemplateExtension,
}

/// Body of `PUT /submissions/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateSubmissionStatus {
    pub status: String,
}

/// Query parameters for listing submissions.
///
/// `search` matches names, surnames, document number and SICPIP note;
/// `organized_crime_name` only matches persons flagged as members.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionListParams {
    pub status: Option<String>,
    pub template_id: Option<DbId>,
    pub search: Option<String>,
    pub document_number: Option<String>,
    pub organized_crime_name: Option<String>,
    pub sex: Option<String>,
    pub department_id: Option<DbId>,
    pub province_id: Option<DbId>,
    pub district_id: Option<DbId>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SubmissionListParams {
    pub fn person_filters(&self) -> PersonFilters {
        PersonFilters {
            search: self.search.clone(),
            document_number: self.document_number.clone(),
            organized_crime_name: self.organized_crime_name.clone(),
            sex: self.sex.clone(),
            department_id: self.department_id,
            province_id: self.province_id,
            district_id: self.district_id,
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }
}

/// Person, place and detention-date filters. Query parameters of
/// `GET /reports/submissions/persons`; also the filter half of
/// [`SubmissionListParams`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonFilters {
    pub search: Option<String>,
    pub document_number: Option<String>,
    pub organized_crime_name: Option<String>,
    pub sex: Option<String>,
    pub department_id: Option<DbId>,
    pub province_id: Option<DbId>,
    pub district_id: Option<DbId>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
}

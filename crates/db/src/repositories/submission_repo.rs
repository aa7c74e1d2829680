//! Repository for form submissions and their satellite tables.
//!
//! [`SubmissionRepo::create_aggregate`] writes the submission and every
//! satellite in one transaction. The template-specific satellite is written
//! last; any failure rolls the whole submission back.
//! [`SubmissionRepo::replace_aggregate`] swaps the satellites of an existing
//! submission under the same guarantee.

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgConnection, PgPool, Postgres};
use sirpol_core::search::build_like_pattern;
use sirpol_core::submission::{TemplateExtension, STATUS_APPROVED};
use sirpol_core::types::DbId;

use crate::models::submission::{
    FormSubmission, NewSubmission, PersonFilters, SubmissionCrime, SubmissionDetail,
    SubmissionDetention, SubmissionListItem, SubmissionListParams, SubmissionLocation,
    SubmissionPerson, SubmissionRequisition, SubmissionUnit,
};

/// Column list for `form_submissions` queries.
const COLUMNS: &str = "\
    id, template_id, submitted_by, submission_number, detention_date, \
    detention_time, sicpip_note, status, updated_by, created_at, updated_at";

const PERSON_COLUMNS: &str = "\
    id, submission_id, first_name, paternal_surname, maternal_surname, age, sex, \
    document_type_id, document_number, nationality, organized_crime_member, \
    organized_crime_name, created_at, updated_at";

const LOCATION_COLUMNS: &str = "id, submission_id, district_id, created_at, updated_at";

const CRIME_COLUMNS: &str = "\
    id, submission_id, crime_subtype_id, position, is_attempt, multiple_crimes, \
    other_crimes, created_at, updated_at";

const UNIT_COLUMNS: &str = "\
    id, submission_id, specialized_directorate, division, police_department, \
    unit_name, created_at, updated_at";

const REQUISITION_COLUMNS: &str =
    "id, submission_id, capture_order_authority, most_wanted, created_at, updated_at";

const DETENTION_COLUMNS: &str = "id, submission_id, motive, created_at, updated_at";

/// Satellite tables, cleared before a replacement is written.
const SATELLITE_TABLES: [&str; 6] = [
    "submission_persons",
    "submission_locations",
    "submission_crimes",
    "submission_units",
    "submission_requisitions",
    "submission_detentions",
];

/// Joins person and place onto `form_submissions s` for [`PERSON_FILTER`].
const PERSON_JOINS: &str = "\
    LEFT JOIN submission_persons p ON p.submission_id = s.id \
    LEFT JOIN submission_locations l ON l.submission_id = s.id \
    LEFT JOIN districts d ON d.id = l.district_id \
    LEFT JOIN provinces pr ON pr.id = d.province_id";

/// Person filter over `$1..$9`, bound by [`bind_person_filters`]. Each
/// filter applies only when set.
const PERSON_FILTER: &str = "\
    ($1::TEXT IS NULL OR p.first_name ILIKE $1 OR p.paternal_surname ILIKE $1 \
        OR p.maternal_surname ILIKE $1 OR p.document_number ILIKE $1 \
        OR s.sicpip_note ILIKE $1) \
    AND ($2::TEXT IS NULL OR p.document_number ILIKE $2) \
    AND ($3::TEXT IS NULL OR (p.organized_crime_member AND p.organized_crime_name ILIKE $3)) \
    AND ($4::TEXT IS NULL OR p.sex = $4) \
    AND ($5::BIGINT IS NULL OR pr.department_id = $5) \
    AND ($6::BIGINT IS NULL OR d.province_id = $6) \
    AND ($7::BIGINT IS NULL OR l.district_id = $7) \
    AND ($8::DATE IS NULL OR s.detention_date >= $8) \
    AND ($9::DATE IS NULL OR s.detention_date <= $9)";

type PgQueryAs<'q, O> = QueryAs<'q, Postgres, O, PgArguments>;

/// Bind [`PERSON_FILTER`]'s nine parameters. Text filters become escaped
/// substring patterns; blank text disables its filter.
fn bind_person_filters<'q, O>(
    query: PgQueryAs<'q, O>,
    filters: &PersonFilters,
) -> PgQueryAs<'q, O> {
    let pattern = |raw: &Option<String>| raw.as_deref().and_then(build_like_pattern);
    query
        .bind(pattern(&filters.search))
        .bind(pattern(&filters.document_number))
        .bind(pattern(&filters.organized_crime_name))
        .bind(filters.sex.clone())
        .bind(filters.department_id)
        .bind(filters.province_id)
        .bind(filters.district_id)
        .bind(filters.date_from)
        .bind(filters.date_to)
}

/// Provides the assembler and CRUD operations for submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Persist a submission and all of its satellites atomically.
    pub async fn create_aggregate(
        pool: &PgPool,
        input: &NewSubmission,
    ) -> Result<FormSubmission, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO form_submissions \
                (template_id, submitted_by, submission_number, detention_date, \
                 detention_time, sicpip_note) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let submission = sqlx::query_as::<_, FormSubmission>(&query)
            .bind(input.template_id)
            .bind(&input.submitted_by)
            .bind(&input.submission_number)
            .bind(input.detention_date)
            .bind(input.detention_time)
            .bind(&input.sicpip_note)
            .fetch_one(&mut *tx)
            .await?;

        insert_satellites(&mut *tx, submission.id, input).await?;

        tx.commit().await?;
        Ok(submission)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FormSubmission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM form_submissions WHERE id = $1");
        sqlx::query_as::<_, FormSubmission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a submission with its template name and every satellite.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SubmissionDetail>, sqlx::Error> {
        let Some(submission) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let template_name: String =
            sqlx::query_scalar("SELECT name FROM form_templates WHERE id = $1")
                .bind(submission.template_id)
                .fetch_one(pool)
                .await?;

        let person = sqlx::query_as::<_, SubmissionPerson>(&format!(
            "SELECT {PERSON_COLUMNS} FROM submission_persons WHERE submission_id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let location = sqlx::query_as::<_, SubmissionLocation>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM submission_locations WHERE submission_id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let crimes = sqlx::query_as::<_, SubmissionCrime>(&format!(
            "SELECT {CRIME_COLUMNS} FROM submission_crimes \
             WHERE submission_id = $1 ORDER BY position ASC"
        ))
        .bind(id)
        .fetch_all(pool)
        .await?;

        let unit = sqlx::query_as::<_, SubmissionUnit>(&format!(
            "SELECT {UNIT_COLUMNS} FROM submission_units WHERE submission_id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let requisition = sqlx::query_as::<_, SubmissionRequisition>(&format!(
            "SELECT {REQUISITION_COLUMNS} FROM submission_requisitions WHERE submission_id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let detention = sqlx::query_as::<_, SubmissionDetention>(&format!(
            "SELECT {DETENTION_COLUMNS} FROM submission_detentions WHERE submission_id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(Some(SubmissionDetail {
            submission,
            template_name,
            person,
            location,
            crimes,
            unit,
            requisition,
            detention,
        }))
    }

    /// Replace the editable fields and every satellite of a submission in
    /// one transaction. Template, number, author and status are kept.
    /// Returns `None` when the row is gone or already approved.
    pub async fn replace_aggregate(
        pool: &PgPool,
        id: DbId,
        input: &NewSubmission,
        updated_by: &str,
    ) -> Result<Option<FormSubmission>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE form_submissions \
             SET detention_date = $1, detention_time = $2, sicpip_note = $3, updated_by = $4 \
             WHERE id = $5 AND status <> $6 \
             RETURNING {COLUMNS}"
        );
        let Some(submission) = sqlx::query_as::<_, FormSubmission>(&query)
            .bind(input.detention_date)
            .bind(input.detention_time)
            .bind(&input.sicpip_note)
            .bind(updated_by)
            .bind(id)
            .bind(STATUS_APPROVED)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        for table in SATELLITE_TABLES {
            sqlx::query(&format!("DELETE FROM {table} WHERE submission_id = $1"))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        insert_satellites(&mut *tx, id, input).await?;

        tx.commit().await?;
        Ok(Some(submission))
    }

    /// List submissions newest-first. Status and template filters plus
    /// every [`PersonFilters`] field; `status` must already be validated.
    pub async fn list(
        pool: &PgPool,
        params: &SubmissionListParams,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubmissionListItem>, sqlx::Error> {
        let query = format!(
            "SELECT s.id, s.template_id, t.name AS template_name, s.submitted_by, \
                    s.submission_number, s.detention_date, s.status, \
                    CASE WHEN p.id IS NULL THEN NULL \
                         ELSE concat_ws(' ', p.first_name, p.paternal_surname, p.maternal_surname) \
                    END AS person_name, \
                    s.created_at \
             FROM form_submissions s \
             JOIN form_templates t ON t.id = s.template_id \
             {PERSON_JOINS} \
             WHERE {PERSON_FILTER} \
               AND ($10::TEXT IS NULL OR s.status = $10) \
               AND ($11::BIGINT IS NULL OR s.template_id = $11) \
             ORDER BY s.created_at DESC, s.id DESC \
             LIMIT $12 OFFSET $13"
        );

        bind_person_filters(
            sqlx::query_as::<_, SubmissionListItem>(&query),
            &params.person_filters(),
        )
        .bind(params.status.as_deref())
        .bind(params.template_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Person counts per sex.
    pub async fn person_counts_by_sex(
        pool: &PgPool,
        filters: &PersonFilters,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let query = format!(
            "SELECT p.sex, COUNT(*) \
             FROM form_submissions s {PERSON_JOINS} \
             WHERE p.id IS NOT NULL AND {PERSON_FILTER} \
             GROUP BY p.sex"
        );
        bind_person_filters(sqlx::query_as(&query), filters)
            .fetch_all(pool)
            .await
    }

    /// Mean person age, `None` when nothing matches.
    pub async fn person_average_age(
        pool: &PgPool,
        filters: &PersonFilters,
    ) -> Result<Option<f64>, sqlx::Error> {
        let query = format!(
            "SELECT AVG(p.age)::DOUBLE PRECISION \
             FROM form_submissions s {PERSON_JOINS} \
             WHERE p.id IS NOT NULL AND {PERSON_FILTER}"
        );
        let (average,): (Option<f64>,) = bind_person_filters(sqlx::query_as(&query), filters)
            .fetch_one(pool)
            .await?;
        Ok(average)
    }

    /// The `limit` most frequent nationalities, ties broken by name.
    pub async fn top_nationalities(
        pool: &PgPool,
        filters: &PersonFilters,
        limit: i64,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let query = format!(
            "SELECT p.nationality, COUNT(*) AS total \
             FROM form_submissions s {PERSON_JOINS} \
             WHERE p.id IS NOT NULL AND {PERSON_FILTER} \
             GROUP BY p.nationality \
             ORDER BY total DESC, p.nationality ASC \
             LIMIT $10"
        );
        bind_person_filters(sqlx::query_as(&query), filters)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Move a submission from `expected` to `next`. Returns `None` when the
    /// row is gone or its status is no longer `expected`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected: &str,
        next: &str,
    ) -> Result<Option<FormSubmission>, sqlx::Error> {
        let query = format!(
            "UPDATE form_submissions SET status = $1 \
             WHERE id = $2 AND status = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormSubmission>(&query)
            .bind(next)
            .bind(id)
            .bind(expected)
            .fetch_optional(pool)
            .await
    }

    /// Delete a submission; satellites cascade. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM form_submissions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Write person, location, crimes, unit and finally the template extension.
async fn insert_satellites(
    conn: &mut PgConnection,
    submission_id: DbId,
    input: &NewSubmission,
) -> Result<(), sqlx::Error> {
    let person = &input.person;
    sqlx::query(
        "INSERT INTO submission_persons \
            (submission_id, first_name, paternal_surname, maternal_surname, age, sex, \
             document_type_id, document_number, nationality, organized_crime_member, \
             organized_crime_name) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(submission_id)
    .bind(person.first_name.trim())
    .bind(person.paternal_surname.trim())
    .bind(person.maternal_surname.as_deref().map(str::trim))
    .bind(person.age)
    .bind(&person.sex)
    .bind(person.document_type_id)
    .bind(person.document_number.trim())
    .bind(&person.nationality)
    .bind(person.organized_crime_member)
    .bind(&person.organized_crime_name)
    .execute(&mut *conn)
    .await?;

    sqlx::query("INSERT INTO submission_locations (submission_id, district_id) VALUES ($1, $2)")
        .bind(submission_id)
        .bind(input.district_id)
        .execute(&mut *conn)
        .await?;

    for (position, crime) in (1_i16..).zip(&input.crimes) {
        sqlx::query(
            "INSERT INTO submission_crimes \
                (submission_id, crime_subtype_id, position, is_attempt, multiple_crimes, \
                 other_crimes) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(submission_id)
        .bind(crime.crime_subtype_id)
        .bind(position)
        .bind(crime.is_attempt)
        .bind(crime.multiple_crimes)
        .bind(&crime.other_crimes)
        .execute(&mut *conn)
        .await?;
    }

    let unit = &input.unit;
    sqlx::query(
        "INSERT INTO submission_units \
            (submission_id, specialized_directorate, division, police_department, unit_name) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(submission_id)
    .bind(&unit.specialized_directorate)
    .bind(&unit.division)
    .bind(&unit.police_department)
    .bind(&unit.unit_name)
    .execute(&mut *conn)
    .await?;

    match &input.extension {
        TemplateExtension::Requisition {
            capture_order_authority,
            most_wanted,
        } => {
            sqlx::query(
                "INSERT INTO submission_requisitions \
                    (submission_id, capture_order_authority, most_wanted) \
                 VALUES ($1, $2, $3)",
            )
            .bind(submission_id)
            .bind(capture_order_authority)
            .bind(*most_wanted)
            .execute(&mut *conn)
            .await?;
        }
        TemplateExtension::Detention { motive } => {
            sqlx::query("INSERT INTO submission_detentions (submission_id, motive) VALUES ($1, $2)")
                .bind(submission_id)
                .bind(motive)
                .execute(&mut *conn)
                .await?;
        }
    }

    Ok(())
}

//! Incident bulk-import rules: required columns and row normalization.
//!
//! The importer works in two phases. [`check_required_columns`] runs once on
//! the header row and either yields a [`ColumnMap`] or the full list of
//! missing columns. [`map_row`] then turns each data row into an
//! [`IncidentRecord`], or a [`RowError`] that causes only that row to be
//! skipped.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::error::CoreError;
use crate::spreadsheet::{is_nan_like, CellValue};
use crate::types::{Date, DbId, Time};

/// Columns every incident spreadsheet must carry, after trimming and
/// uppercasing the header row.
pub const REQUIRED_COLUMNS: [&str; 32] = [
    "ID_DOC_DENUNCIA",
    "LIBRO",
    "NUM_DENUNCIA",
    "TIPODENUNCIA",
    "SITUACIONDENUNCIA",
    "TIPO",
    "SUBTIPO",
    "MODALIDAD",
    "FEC_HORA_HECHO",
    "DPTO",
    "PROV",
    "DISTRITO",
    "TIPOVIA",
    "UBICACION",
    "CUADRA",
    "DNI",
    "APELLIDO_PATERNO",
    "APELLIDO_MATERNO",
    "NOMBRE",
    "SITUACIONPERSONA",
    "FEC_NACIMIENTO",
    "EDAD_PERSONA",
    "SEXO",
    "ESTADOCIVIL",
    "GRADOINSTRUCCION",
    "OCUPACION",
    "PAIS_NATAL",
    "REGION",
    "DESCRIPCIONCOMISARIA",
    "FEC_REGISTRO",
    "XX",
    "YY",
];

/// Data row `i` (zero-based) sits on spreadsheet line `i + 2`: one for the
/// header and one because spreadsheets count from 1.
pub const FIRST_DATA_LINE: usize = 2;

/// Spreadsheet line number of a zero-based data row index, for log messages.
pub fn sheet_line(row_index: usize) -> usize {
    row_index + FIRST_DATA_LINE
}

// ---------------------------------------------------------------------------
// Header validation
// ---------------------------------------------------------------------------

/// Normalize a header cell: trim surrounding whitespace and uppercase.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// The header row lacked one or more required columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required columns: {}", missing.join(", "))]
pub struct MissingColumns {
    /// Required columns not found, in canonical order.
    pub missing: Vec<String>,
    /// Normalized column names that were received.
    pub received: Vec<String>,
}

/// Position of each required column within a row.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    positions: HashMap<&'static str, usize>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl ColumnMap {
    fn cell<'a>(&self, row: &'a [CellValue], column: &'static str) -> &'a CellValue {
        self.positions
            .get(column)
            .and_then(|&idx| row.get(idx))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// Check the header row and locate every required column.
///
/// When a normalized name appears more than once, the first occurrence wins.
pub fn check_required_columns(headers: &[String]) -> Result<ColumnMap, MissingColumns> {
    let received: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let mut positions = HashMap::with_capacity(REQUIRED_COLUMNS.len());
    let mut missing = Vec::new();
    for column in REQUIRED_COLUMNS {
        match received.iter().position(|h| h == column) {
            Some(idx) => {
                positions.insert(column, idx);
            }
            None => missing.push(column.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(ColumnMap { positions })
    } else {
        Err(MissingColumns { missing, received })
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

/// Why a single row could not be turned into an incident.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("column {column}: expected an integer, got '{value}'")]
    NotAnInteger { column: &'static str, value: String },

    #[error("column {column}: expected a number, got '{value}'")]
    NotANumber { column: &'static str, value: String },

    #[error("column {column}: value out of range")]
    OutOfRange { column: &'static str },
}

/// A normalized incident row, ready to be persisted under an import batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentRecord {
    pub document_id: i64,
    pub book: String,
    pub complaint_number: String,
    pub complaint_type: String,
    pub complaint_status: String,
    pub category: String,
    pub subcategory: String,
    pub modality: String,
    pub event_date: Option<Date>,
    pub event_time: Option<Time>,
    pub department: String,
    pub province: String,
    pub district: String,
    pub street_type: String,
    pub address: String,
    pub block: String,
    pub dni: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub first_name: String,
    pub person_status: String,
    pub birth_date: Option<Date>,
    pub birth_time: Option<Time>,
    pub age: i32,
    pub sex: String,
    pub marital_status: String,
    pub education_level: String,
    pub occupation: String,
    pub birth_country: String,
    pub region: String,
    pub police_station: String,
    pub registered_date: Option<Date>,
    pub registered_time: Option<Time>,
    #[serde(serialize_with = "serialize_finite")]
    pub coord_x: f64,
    #[serde(serialize_with = "serialize_finite")]
    pub coord_y: f64,
}

/// Map one data row to an [`IncidentRecord`].
pub fn map_row(columns: &ColumnMap, row: &[CellValue]) -> Result<IncidentRecord, RowError> {
    let text = |column: &'static str| cell_text(columns.cell(row, column));
    let moment = |column: &'static str| split_datetime(cell_datetime(columns.cell(row, column)));

    let (event_date, event_time) = moment("FEC_HORA_HECHO");
    let (birth_date, birth_time) = moment("FEC_NACIMIENTO");
    let (registered_date, registered_time) = moment("FEC_REGISTRO");

    let age = cell_int("EDAD_PERSONA", columns.cell(row, "EDAD_PERSONA"))?;
    let age = i32::try_from(age).map_err(|_| RowError::OutOfRange {
        column: "EDAD_PERSONA",
    })?;

    Ok(IncidentRecord {
        document_id: cell_int("ID_DOC_DENUNCIA", columns.cell(row, "ID_DOC_DENUNCIA"))?,
        book: text("LIBRO"),
        complaint_number: text("NUM_DENUNCIA"),
        complaint_type: text("TIPODENUNCIA"),
        complaint_status: text("SITUACIONDENUNCIA"),
        category: text("TIPO"),
        subcategory: text("SUBTIPO"),
        modality: text("MODALIDAD"),
        event_date,
        event_time,
        department: text("DPTO"),
        province: text("PROV"),
        district: text("DISTRITO"),
        street_type: text("TIPOVIA"),
        address: text("UBICACION"),
        block: text("CUADRA"),
        dni: text("DNI"),
        paternal_surname: text("APELLIDO_PATERNO"),
        maternal_surname: text("APELLIDO_MATERNO"),
        first_name: text("NOMBRE"),
        person_status: text("SITUACIONPERSONA"),
        birth_date,
        birth_time,
        age,
        sex: text("SEXO"),
        marital_status: text("ESTADOCIVIL"),
        education_level: text("GRADOINSTRUCCION"),
        occupation: text("OCUPACION"),
        birth_country: text("PAIS_NATAL"),
        region: text("REGION"),
        police_station: text("DESCRIPCIONCOMISARIA"),
        registered_date,
        registered_time,
        coord_x: cell_float("XX", columns.cell(row, "XX"))?,
        coord_y: cell_float("YY", columns.cell(row, "YY"))?,
    })
}

/// Render a cell as text. Blank and NA-marker cells become `""`; whole
/// floats drop the fractional part so numeric DNIs survive intact.
pub fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Text(s) if is_nan_like(s) => String::new(),
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Int(i) => i.to_string(),
        CellValue::Float(f) if f.is_nan() => String::new(),
        CellValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        CellValue::Float(f) => f.to_string(),
        CellValue::Bool(b) => b.to_string(),
        CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// Read an integer cell. Blank and NA-marker cells become `0`; floats
/// truncate.
pub fn cell_int(column: &'static str, cell: &CellValue) -> Result<i64, RowError> {
    match cell {
        CellValue::Empty => Ok(0),
        CellValue::Text(s) if is_nan_like(s) => Ok(0),
        CellValue::Int(i) => Ok(*i),
        CellValue::Bool(b) => Ok(i64::from(*b)),
        CellValue::Float(f) if f.is_nan() => Ok(0),
        CellValue::Float(f) => {
            if f.is_finite() && f.abs() < i64::MAX as f64 {
                Ok(f.trunc() as i64)
            } else {
                Err(RowError::OutOfRange { column })
            }
        }
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed.parse::<i64>().map_err(|_| RowError::NotAnInteger {
                column,
                value: trimmed.to_string(),
            })
        }
        CellValue::DateTime(dt) => Err(RowError::NotAnInteger {
            column,
            value: dt.to_string(),
        }),
    }
}

/// Read a floating-point cell. Blank, NaN and NA-marker cells become `0.0`;
/// infinities pass through.
pub fn cell_float(column: &'static str, cell: &CellValue) -> Result<f64, RowError> {
    match cell {
        CellValue::Empty => Ok(0.0),
        CellValue::Text(s) if is_nan_like(s) => Ok(0.0),
        CellValue::Float(f) if f.is_nan() => Ok(0.0),
        CellValue::Int(i) => Ok(*i as f64),
        CellValue::Float(f) => Ok(*f),
        CellValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed.parse::<f64>().map_err(|_| RowError::NotANumber {
                column,
                value: trimmed.to_string(),
            })
        }
        CellValue::DateTime(dt) => Err(RowError::NotANumber {
            column,
            value: dt.to_string(),
        }),
    }
}

/// Read a date/time cell leniently. Anything unparseable is `None`.
pub fn cell_datetime(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Text(s) => parse_lenient_datetime(s),
        _ => None,
    }
}

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Parse a textual date or datetime. Day-first for slash dates.
///
/// Date-only input yields midnight.
pub fn parse_lenient_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Split an optional datetime into its date and time halves.
pub fn split_datetime(value: Option<NaiveDateTime>) -> (Option<Date>, Option<Time>) {
    match value {
        Some(dt) => (Some(dt.date()), Some(dt.time())),
        None => (None, None),
    }
}

/// Serialize a float as a JSON number, or `null` when it is NaN or infinite.
pub fn serialize_finite<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

/// Parse the `ids` field of a bulk-delete body. It must be a non-empty list
/// of integer ids.
pub fn parse_id_list(ids: Option<&serde_json::Value>) -> Result<Vec<DbId>, CoreError> {
    let Some(serde_json::Value::Array(items)) = ids else {
        return Err(CoreError::Validation("ids: must be a list of incident ids".into()));
    };
    if items.is_empty() {
        return Err(CoreError::Validation("ids: must not be empty".into()));
    }
    items
        .iter()
        .map(|item| {
            item.as_i64()
                .ok_or_else(|| CoreError::Validation(format!("ids: '{item}' is not an integer id")))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

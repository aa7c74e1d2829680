//! Spreadsheet decoding for bulk imports.
//!
//! Reads the first worksheet of an uploaded workbook (XLSX, XLS, XLSB or ODS)
//! into a [`Sheet`]: one header row plus data rows of [`CellValue`]s. Row
//! mapping works on `Sheet` only, so it can be tested without workbook files.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// A single decoded cell, independent of the workbook library.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// Text markers that mean "no value" in exported spreadsheets, compared
/// case-insensitively after trimming.
pub const NA_MARKERS: [&str; 14] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NAN", "1.#IND", "1.#QNAN", "<NA>", "N/A",
    "NA", "NULL", "NAN", "NONE",
];

/// True when `raw` is one of the [`NA_MARKERS`].
pub fn is_nan_like(raw: &str) -> bool {
    let trimmed = raw.trim();
    NA_MARKERS.iter().any(|marker| marker.eq_ignore_ascii_case(trimmed))
}

/// Errors raised while opening a workbook.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Unreadable workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook contains no worksheets")]
    NoWorksheet,

    #[error("Worksheet has no header row")]
    NoHeader,
}

/// First worksheet of a workbook: header names and data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// Header cells rendered as text, in column order, untrimmed.
    pub headers: Vec<String>,
    /// Data rows in sheet order. Rows whose cells are all blank are dropped.
    pub rows: Vec<Vec<CellValue>>,
}

/// Decode the first worksheet of an in-memory workbook.
pub fn decode_workbook(bytes: Vec<u8>) -> Result<Sheet, SheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)??;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(SheetError::NoHeader)?;
    let headers: Vec<String> = header_row.iter().map(header_text).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(SheetError::NoHeader);
    }

    let rows = rows
        .map(|row| row.iter().map(convert_cell).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(CellValue::is_blank))
        .collect();

    Ok(Sheet { headers, rows })
}

fn header_text(cell: &Data) -> String {
    if let Data::String(s) = cell {
        return s.clone();
    }
    match convert_cell(cell) {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => s,
        CellValue::Int(i) => i.to_string(),
        CellValue::Float(f) => f.to_string(),
        CellValue::Bool(b) => b.to_string(),
        CellValue::DateTime(dt) => dt.to_string(),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if is_nan_like(s) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Empty,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        // #N/A, #DIV/0! and friends carry no value.
        Data::Error(_) => CellValue::Empty,
    }
}

/// Convert an Excel serial date (1900 date system) to a naive datetime.
///
/// Serial `1.0` is 1899-12-31; the fractional part is the time of day.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round();
    if millis > i64::MAX as f64 {
        return None;
    }
    epoch.checked_add_signed(Duration::milliseconds(millis as i64))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

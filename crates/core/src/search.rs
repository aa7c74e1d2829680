//! List query helpers shared by every paginated or searchable endpoint.

use crate::error::CoreError;
use crate::types::Date;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Hard upper bound for any page size.
pub const MAX_PAGE_SIZE: i64 = 500;

/// Clamp a user-provided limit to `1..=max`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Build an `ILIKE` pattern for a case-insensitive substring search.
///
/// Returns `None` for blank input so callers can skip the filter entirely.
/// `%`, `_` and `\` in the user input are escaped so they match literally.
pub fn build_like_pattern(search: &str) -> Option<String> {
    let trimmed = search.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(trimmed.len() + 2);
    escaped.push('%');
    for ch in trimmed.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}

/// Reject a date range whose start is after its end.
pub fn validate_date_range(from: Option<Date>, to: Option<Date>) -> Result<(), CoreError> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(CoreError::Validation(format!(
                "date_from ({from}) must not be after date_to ({to})"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Sort direction on the `name` column of reference lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameOrdering {
    #[default]
    Ascending,
    Descending,
}

impl NameOrdering {
    /// Parse the `ordering` query parameter (`name` or `-name`).
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") | Some("name") => Ok(Self::Ascending),
            Some("-name") => Ok(Self::Descending),
            Some(other) => Err(CoreError::Validation(format!(
                "Invalid ordering '{other}'. Must be one of: [\"name\", \"-name\"]"
            ))),
        }
    }

    /// SQL `ORDER BY` body. `id` breaks ties so pages are stable.
    pub fn sql(self) -> &'static str {
        match self {
            Self::Ascending => "name ASC, id ASC",
            Self::Descending => "name DESC, id ASC",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date without a time zone (event, birth and registration dates).
pub type Date = chrono::NaiveDate;

/// Wall-clock time without a time zone.
pub type Time = chrono::NaiveTime;

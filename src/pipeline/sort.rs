use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::api::Reading;

/// Offset-less layouts the data API emits for naive timestamp columns.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a reading timestamp into an instant.
///
/// RFC 3339 values carry their own offset. Offset-less values are wall-clock
/// times in `local`. Returns `None` for anything else.
#[must_use]
pub fn parse_time(raw: &str, local: FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Sort key of a reading. Missing or unparseable times map to `None`, which
/// orders before every real instant.
#[must_use]
pub fn sort_key(reading: &Reading, local: FixedOffset) -> Option<DateTime<Utc>> {
    reading.time.as_deref().and_then(|t| parse_time(t, local))
}

/// Return the readings in ascending time order, leaving `history` untouched.
///
/// The sort is stable: readings with equal timestamps keep their relative
/// order, and so do readings whose timestamps cannot be parsed.
#[must_use]
pub fn sort_history(history: &[Reading], local: FixedOffset) -> Vec<Reading> {
    let mut keyed: Vec<(Option<DateTime<Utc>>, &Reading)> = history
        .iter()
        .map(|reading| (sort_key(reading, local), reading))
        .collect();

    keyed.sort_by_key(|(key, _)| *key);

    keyed.into_iter().map(|(_, reading)| reading.clone()).collect()
}

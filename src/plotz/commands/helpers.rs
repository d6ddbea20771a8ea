use crate::api::Garden;
use crate::codec::iso8601;
use crate::commands::ActivityRow;
use crate::error::{PlotzError, Result};
use crate::model::Activity;
use crate::store::backend::StorageBackend;
use chrono::{DateTime, Duration, Utc};

/// Parse a date given on the command line.
///
/// Accepts `today`, `tomorrow`, `yesterday`, `YYYY-MM-DD` (midnight UTC) or a
/// full RFC 3339 timestamp. Relative words keep the time of day of `now`.
pub fn parse_date(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "today" => Ok(now),
        "tomorrow" => Ok(now + Duration::days(1)),
        "yesterday" => Ok(now - Duration::days(1)),
        _ => iso8601::parse(trimmed).ok_or_else(|| {
            PlotzError::Api(format!(
                "Invalid date '{}' (use YYYY-MM-DD, today, tomorrow or yesterday)",
                input
            ))
        }),
    }
}

pub fn activity_row<B: StorageBackend + Clone>(
    garden: &Garden<B>,
    activity: &Activity,
) -> ActivityRow {
    ActivityRow {
        activity: activity.clone(),
        plant_name: garden.plant_name_for(activity).to_string(),
    }
}

//! # Persistence Codec
//!
//! Converts a store's in-memory state to the string blob kept by the
//! [`StorageBackend`](crate::store::backend::StorageBackend), and back.
//!
//! ## Blob Layout
//!
//! ```text
//! {
//!   "state": { "<collection>": <value> },
//!   "version": 0
//! }
//! ```
//!
//! `<collection>` is `plants`, `activities` or `settings`. Date fields are
//! RFC 3339 strings on disk (`"2023-04-15T00:00:00Z"`) and `DateTime<Utc>` in
//! memory. The conversion is attached to the date fields themselves through
//! [`iso8601`], so every other field passes through serde untouched.
//!
//! Round trip: `decode(encode(s)) == s`. Dates compare by instant, and the
//! encoder never drops sub-second precision.

use crate::error::{PlotzError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version stamped into every blob this build writes.
pub const STATE_VERSION: u32 = 0;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: Map<String, Value>,
    #[serde(default)]
    version: u32,
}

/// Encode `value` as the `collection` field of a persisted blob.
pub fn encode<T: Serialize + ?Sized>(collection: &str, value: &T) -> Result<String> {
    let mut state = Map::new();
    state.insert(collection.to_string(), serde_json::to_value(value)?);
    let envelope = Envelope {
        state,
        version: STATE_VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decode the `collection` field of a persisted blob.
pub fn decode<T: DeserializeOwned>(collection: &str, blob: &str) -> Result<T> {
    let mut envelope: Envelope = serde_json::from_str(blob)?;
    if envelope.version > STATE_VERSION {
        return Err(PlotzError::Store(format!(
            "persisted state version {} is newer than supported version {}",
            envelope.version, STATE_VERSION
        )));
    }
    let value = envelope.state.remove(collection).ok_or_else(|| {
        PlotzError::Store(format!("persisted state has no `{}` field", collection))
    })?;
    Ok(serde_json::from_value(value)?)
}

/// Serde adapter for date fields.
///
/// Writes RFC 3339 in UTC with a `Z` suffix. Reads any RFC 3339 timestamp
/// (fractional seconds and offsets allowed) and also a bare `YYYY-MM-DD`,
/// which is taken as midnight UTC.
pub mod iso8601 {
    use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 date: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
            return Some(date.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

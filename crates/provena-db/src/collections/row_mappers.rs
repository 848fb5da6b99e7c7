//! Row mapping helpers shared by the `SQLite` collections.

use base64::Engine;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use provena_core::{Attributes, RepositoryError};

/// Map `SQLx` errors to `RepositoryError`.
///
/// `what` names the entity for constraint messages.
pub fn map_sqlx_error(e: sqlx::Error, what: &str) -> RepositoryError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return RepositoryError::AlreadyExists(what.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Constraint(format!("{what}: {db_err}"));
        }
    }
    RepositoryError::Storage(e.to_string())
}

/// Format a timestamp as fixed-width RFC 3339 so text order is time order.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Format a filter bound, rounding up to the stored precision.
///
/// Stored times are truncated to microseconds, so rounding the bound up keeps
/// `time >= since` and `time < until` exact for sub-microsecond bounds.
pub fn format_bound(bound: DateTime<Utc>) -> String {
    let excess = bound.timestamp_subsec_nanos() % 1_000;
    if excess == 0 {
        return format_timestamp(bound);
    }
    format_timestamp(bound + Duration::nanoseconds(i64::from(1_000 - excess)))
}

/// Parse a timestamp written by [`format_timestamp`].
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Serialization(format!("bad timestamp `{s}`: {e}")))
}

/// Serialize attributes to a JSON column.
pub fn attributes_to_json(attributes: &Attributes) -> Result<String, RepositoryError> {
    serde_json::to_string(attributes).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Deserialize a JSON column into attributes. Empty text is an empty map.
pub fn attributes_from_json(json: &str) -> Result<Attributes, RepositoryError> {
    if json.trim().is_empty() {
        return Ok(Attributes::new());
    }
    serde_json::from_str(json).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Encode attributes as base64 JSON.
///
/// Used for credentials so they are not stored as plain text. This is
/// encoding, not encryption.
pub fn encode_attributes(attributes: &Attributes) -> Result<String, RepositoryError> {
    let json = attributes_to_json(attributes)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(json.as_bytes()))
}

/// Decode attributes written by [`encode_attributes`].
pub fn decode_attributes(encoded: &str) -> Result<Attributes, RepositoryError> {
    if encoded.is_empty() {
        return Ok(Attributes::new());
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| RepositoryError::Serialization(format!("Failed to decode params: {e}")))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| RepositoryError::Serialization(format!("Invalid UTF-8 in params: {e}")))?;
    attributes_from_json(&json)
}

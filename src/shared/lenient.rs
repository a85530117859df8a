//! Tolerant deserializers for report-service payloads.
//!
//! Display logic must never fail on a value it does not recognise, so enum
//! and timestamp fields decode to `None` (with a warning) instead of
//! rejecting the whole report.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

use crate::features::lifecycle::{IssueType, Priority, ReportStatus};

fn enum_value<'de, D, T>(deserializer: D, what: &str) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => match raw.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!("Unrecognised {} value from report service: {}", what, raw);
                None
            }
        },
        Some(other) => {
            tracing::warn!("Unexpected {} value from report service: {}", what, other);
            None
        }
    })
}

pub fn status<'de, D>(deserializer: D) -> Result<Option<ReportStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    enum_value(deserializer, "status")
}

pub fn issue_type<'de, D>(deserializer: D) -> Result<Option<IssueType>, D::Error>
where
    D: Deserializer<'de>,
{
    enum_value(deserializer, "issue_type")
}

pub fn priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    enum_value(deserializer, "priority")
}

/// Parse an ISO-8601 timestamp; naive values are taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => {
            let parsed = parse_timestamp(&raw);
            if parsed.is_none() {
                tracing::warn!("Unparsable timestamp from report service: {}", raw);
            }
            parsed
        }
        Some(other) => {
            tracing::warn!("Unexpected timestamp value from report service: {}", other);
            None
        }
    })
}

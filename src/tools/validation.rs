//! Field-level checks shared by the tool query types.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::error::{PlannerError, PlannerResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reject blank identifiers such as airport codes or locations.
pub fn require_non_empty(tool: &str, field: &str, value: &str) -> PlannerResult<()> {
    if value.trim().is_empty() {
        return Err(PlannerError::tool_argument(
            tool,
            format!("field '{}' must not be empty", field),
        ));
    }
    Ok(())
}

/// Reject date ranges that end before they start.
pub fn require_ordered(
    tool: &str,
    start_field: &str,
    start: NaiveDate,
    end_field: &str,
    end: NaiveDate,
) -> PlannerResult<()> {
    if end < start {
        return Err(PlannerError::tool_argument(
            tool,
            format!("'{}' ({}) is before '{}' ({})", end_field, end, start_field, start),
        ));
    }
    Ok(())
}

/// Deserialize an optional ISO date, treating `null` and `""` as absent.
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid date '{}': {}", value, e))),
    }
}

/// Deserialize a required ISO date with a message that names the bad value.
pub fn iso_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| serde::de::Error::custom(format!("invalid date '{}': {}", raw, e)))
}

pub fn default_currency() -> String {
    "USD".to_string()
}

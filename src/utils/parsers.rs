use chrono::{NaiveDate, NaiveDateTime};

use crate::types::{ObjectKind, ObjectName};

pub fn parse_cutoff_date(input: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y.%m.%d:%H.%M.%S") {
        return Ok(dt);
    }

    NaiveDate::parse_from_str(input, "%Y.%m.%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            format!(
                "Invalid date format: '{}'. Expected 'YYYY.MM.DD[:HH24.MI.SS]'",
                input
            )
        })
}

pub fn parse_object_name(input: &str) -> Result<ObjectName, String> {
    ObjectName::parse(input).map_err(|e| e.to_string())
}

pub fn parse_object_kind(input: &str) -> Result<ObjectKind, String> {
    input
        .parse::<ObjectKind>()
        .map_err(|_| format!("Unknown object kind '{}'", input))
}

use chrono::NaiveDate;

use crate::error::{ApiError, ApiResult};

/// Parses an optional `YYYY-MM-DD` query parameter.
pub fn parse_date_param(name: &str, value: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| ApiError::BadRequest(format!("Invalid {}: {}", name, e))),
        None => Ok(None),
    }
}

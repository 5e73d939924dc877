// services/validate.rs - Request field validation shared by the record services

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::{non_empty, Patch};

/// Trimmed, non-empty text or a validation error naming the field
pub fn required_text(field: &str, value: Option<&str>) -> Result<String, ApiError> {
    value
        .and_then(non_empty)
        .ok_or_else(|| ApiError::invalid_field(field, "is required"))
}

pub fn required_id(field: &str, value: Option<Uuid>) -> Result<Uuid, ApiError> {
    value.ok_or_else(|| ApiError::invalid_field(field, "is required"))
}

/// Optional free text; blank becomes `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.as_deref().and_then(non_empty)
}

/// Patch of a non-nullable text column
pub fn patch_text(field: &str, value: Patch<String>) -> Result<Option<String>, ApiError> {
    match value {
        None => Ok(None),
        Some(None) => Err(ApiError::invalid_field(field, "cannot be null")),
        Some(Some(text)) => non_empty(&text)
            .map(Some)
            .ok_or_else(|| ApiError::invalid_field(field, "cannot be empty")),
    }
}

/// Patch of a nullable text column; blank clears it
pub fn patch_optional_text(value: Patch<String>) -> Option<Option<String>> {
    value.map(|inner| inner.as_deref().and_then(non_empty))
}

/// Patch of a non-nullable flag
pub fn patch_flag(field: &str, value: Patch<bool>) -> Result<Option<bool>, ApiError> {
    match value {
        None => Ok(None),
        Some(None) => Err(ApiError::invalid_field(field, "cannot be null")),
        Some(Some(flag)) => Ok(Some(flag)),
    }
}

/// `YYYY-MM-DD`
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::invalid_field(field, "must be a date in YYYY-MM-DD format"))
}

/// Optional date where blank means absent
pub fn optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value.and_then(non_empty) {
        Some(text) => parse_date(field, &text).map(Some),
        None => Ok(None),
    }
}

/// Patch of a nullable date column; blank clears it
pub fn patch_date(field: &str, value: Patch<String>) -> Result<Option<Option<NaiveDate>>, ApiError> {
    match value {
        None => Ok(None),
        Some(inner) => optional_date(field, inner.as_deref()).map(Some),
    }
}

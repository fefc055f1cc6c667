//! Field-level checks shared by the request forms.
//!
//! Forms arrive as loosely typed JSON (the shapes a web client posts). Each
//! form's `validate` turns it into the typed record the calculators and the
//! store work with, failing with `FinTrackError::InvalidInput` naming the
//! offending field.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;

use crate::error::FinTrackError;
use crate::FinTrackResult;

pub const MAX_NAME_LEN: usize = 120;
pub const MAX_CATEGORY_LEN: usize = 64;
pub const MAX_DESCRIPTION_LEN: usize = 255;
/// Longest loan term (and paid-month count) accepted: 100 years.
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Required, non-blank text of at most `max` characters. Returns it trimmed.
pub fn required_text(field: &str, value: &str, max: usize) -> FinTrackResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FinTrackError::invalid(field, "must not be empty"));
    }
    if trimmed.chars().count() > max {
        return Err(FinTrackError::invalid(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Optional free text. Empty strings are treated as absent.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> FinTrackResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max => Err(FinTrackError::invalid(
            field,
            format!("must be at most {max} characters"),
        )),
        Some(text) => Ok(Some(text.to_string())),
    }
}

pub fn positive(field: &str, value: Decimal) -> FinTrackResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(FinTrackError::invalid(field, "must be > 0"));
    }
    Ok(value)
}

pub fn non_negative(field: &str, value: Decimal) -> FinTrackResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(FinTrackError::invalid(field, "must be >= 0"));
    }
    Ok(value)
}

/// Positive whole number of months, at most [`MAX_TERM_MONTHS`].
pub fn positive_months(field: &str, value: i64) -> FinTrackResult<u32> {
    if value <= 0 {
        return Err(FinTrackError::invalid(field, "must be a positive integer"));
    }
    bounded_months(field, value)
}

pub fn non_negative_months(field: &str, value: i64) -> FinTrackResult<u32> {
    if value < 0 {
        return Err(FinTrackError::invalid(field, "must be >= 0"));
    }
    bounded_months(field, value)
}

fn bounded_months(field: &str, value: i64) -> FinTrackResult<u32> {
    match u32::try_from(value) {
        Ok(months) if months <= MAX_TERM_MONTHS => Ok(months),
        _ => Err(FinTrackError::invalid(
            field,
            format!("must be at most {MAX_TERM_MONTHS} months"),
        )),
    }
}

/// ISO calendar date. Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, in
/// which case only the date part is kept.
pub fn iso_date(field: &str, value: &str) -> FinTrackResult<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| FinTrackError::invalid(field, format!("'{value}' is not an ISO date")))
}

pub fn optional_iso_date(field: &str, value: Option<&str>) -> FinTrackResult<Option<NaiveDate>> {
    value.map(|v| iso_date(field, v)).transpose()
}

//! Input validation helpers
//!
//! [`ValidatedJson`] deserializes a body and runs its `validator` rules;
//! failures become a 400 with the field errors under `details.errors`.

use axum::extract::{FromRequest, Json, Request};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use shared::error::AppError;
use validator::{Validate, ValidationErrors};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: items, recipes, suppliers, people
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, unit, reference numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Calendar date format used by expiry, hire and payroll dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Convert `validator` errors into the API error shape
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let details = serde_json::to_value(&errors).unwrap_or_default();
    AppError::validation("Validation failed").with_detail("errors", details)
}

/// Run the derive rules of a payload
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(validation_error)
}

/// Validate that a required string is not blank (derive rules only count chars)
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        AppError::validation(format!("{field} must be a YYYY-MM-DD date, got '{value}'"))
            .with_detail("field", field)
    })
}

/// Validate an optional `YYYY-MM-DD` date
pub fn validate_optional_date(value: &Option<String>, field: &str) -> Result<(), AppError> {
    if let Some(v) = value {
        parse_date(v, field)?;
    }
    Ok(())
}

/// JSON body extractor that also runs `validator` rules
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::invalid_request(rejection.body_text()))?;
        validate_payload(&payload)?;
        Ok(Self(payload))
    }
}

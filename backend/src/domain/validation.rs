//! Input validation applied at the API boundary, before data reaches the
//! persistence layer.

use chrono::{NaiveDate, NaiveTime};
use shared::{AffirmationData, NotificationSettings, PledgeData};

/// Longest free-text answer accepted from a wizard step
pub const MAX_TEXT_LENGTH: usize = 10_000;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Amount must be a non-negative number, got '{0}'")]
    InvalidAmount(String),
    #[error("Deadline must be a date in YYYY-MM-DD format, got '{0}'")]
    InvalidDeadline(String),
    #[error("Field '{0}' is too long")]
    TextTooLong(&'static str),
    #[error("Time must be in HH:MM format, got '{0}'")]
    InvalidTime(String),
    #[error("Step {0} does not exist")]
    UnknownStep(u8),
}

/// Parse a user-entered amount into the numeric value stored remotely
///
/// An empty amount means "not filled in yet" and maps to `None`.
pub fn parse_amount(amount: &str) -> Result<Option<f64>, ValidationError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(ValidationError::InvalidAmount(amount.to_string())),
    }
}

/// Render a stored amount back into the string shape of the domain record
pub fn format_amount(amount: Option<f64>) -> String {
    amount.map(|value| value.to_string()).unwrap_or_default()
}

/// Parse an optional deadline; empty means "not filled in yet"
pub fn parse_deadline(deadline: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let trimmed = deadline.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidDeadline(deadline.to_string()))
}

fn check_length(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(ValidationError::TextTooLong(field));
    }
    Ok(())
}

pub fn validate_affirmation(data: &AffirmationData) -> Result<(), ValidationError> {
    parse_amount(&data.amount)?;
    parse_deadline(&data.deadline)?;
    check_length("exchange", &data.exchange)?;
    check_length("plan", &data.plan)?;
    check_length("statement", &data.statement)?;
    Ok(())
}

pub fn validate_pledge(data: &PledgeData) -> Result<(), ValidationError> {
    check_length("principle_1", &data.principle_1)?;
    check_length("principle_2", &data.principle_2)?;
    check_length("principle_3", &data.principle_3)?;
    check_length("principle_4", &data.principle_4)?;
    Ok(())
}

/// Check a reminder time such as "07:00"
pub fn validate_time(time: &str) -> Result<NaiveTime, ValidationError> {
    if time.len() != 5 {
        return Err(ValidationError::InvalidTime(time.to_string()));
    }
    NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| ValidationError::InvalidTime(time.to_string()))
}

pub fn validate_notification_settings(settings: &NotificationSettings) -> Result<(), ValidationError> {
    validate_time(&settings.morning_time)?;
    validate_time(&settings.evening_time)?;
    Ok(())
}

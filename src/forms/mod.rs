//! # Forms
//!
//! Every submission the front-end makes goes through a form model first.
//! A form holds the raw user input; `validate` either yields the typed
//! request body for the matching service call or every rule that failed,
//! so nothing malformed reaches the backend.

pub mod account;
pub mod booking;
pub mod operator;

pub use account::{LoginForm, PasswordForm, ProfileForm, RegisterForm};
pub use booking::{BookingForm, PaymentForm, SearchForm, MAX_PASSENGERS};
pub use operator::{CompanyForm, LocationForm, RouteForm, ScheduleForm, MAX_BUS_SEATS};

use std::fmt::Display;

use chrono::{Datelike, NaiveDate};

use crate::error::{ValidationError, ValidationErrors};

pub type ValidationResult = Result<(), ValidationError>;

pub trait Form {
    type Output;

    fn validate(&self) -> Result<Self::Output, ValidationErrors>;

    /// Whether submitting right now would pass; drives the submit button.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

// =============================================================================
// Validators
// =============================================================================

pub fn required(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

pub fn min_length(field: &str, value: &str, min: usize) -> ValidationResult {
    if value.chars().count() < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    Ok(())
}

pub fn max_length(field: &str, value: &str, max: usize) -> ValidationResult {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

pub fn min_value<T: PartialOrd + Display>(field: &str, value: T, min: T) -> ValidationResult {
    if value < min {
        return Err(ValidationError::BelowMin {
            field: field.to_string(),
            min: min.to_string(),
        });
    }
    Ok(())
}

pub fn max_value<T: PartialOrd + Display>(field: &str, value: T, max: T) -> ValidationResult {
    if value > max {
        return Err(ValidationError::AboveMax {
            field: field.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Amounts and prices must be strictly positive (and finite).
pub fn positive(field: &str, value: f64) -> ValidationResult {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

pub fn email(field: &str, value: &str) -> ValidationResult {
    let value = value.trim();
    let invalid = || ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid email address".to_string(),
    };

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(())
}

/// Phone numbers: optional leading `+`, 9 to 15 digits, spaces and dashes allowed.
pub fn phone(field: &str, value: &str) -> ValidationResult {
    let value = value.trim();
    let body = value.strip_prefix('+').unwrap_or(value);
    let digits = body.chars().filter(char::is_ascii_digit).count();
    let allowed = body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');

    if !allowed || !(9..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a phone number of 9 to 15 digits".to_string(),
        });
    }
    Ok(())
}

/// Runs `validator` only when the optional input was filled in.
pub fn optional(
    value: &str,
    validator: impl FnOnce(&str) -> ValidationResult,
) -> ValidationResult {
    if value.trim().is_empty() {
        Ok(())
    } else {
        validator(value)
    }
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a date like 2026-11-03".to_string(),
        }
    })
}

pub fn not_in_past(field: &str, date: NaiveDate, today: NaiveDate) -> ValidationResult {
    if date < today {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "cannot be in the past".to_string(),
        });
    }
    Ok(())
}

/// Luhn checksum over a card number (spaces and dashes ignored).
pub fn card_number(field: &str, value: &str) -> ValidationResult {
    let cleaned: String = value.chars().filter(|c| *c != ' ' && *c != '-').collect();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    if !cleaned.chars().all(|c| c.is_ascii_digit()) || !(13..=19).contains(&cleaned.len()) {
        return Err(invalid("must be 13 to 19 digits"));
    }

    let sum: u32 = cleaned
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    if sum % 10 != 0 {
        return Err(invalid("is not a valid card number"));
    }
    Ok(())
}

/// `MM/YY`, valid through the last day of that month.
pub fn card_expiry(field: &str, value: &str, today: NaiveDate) -> ValidationResult {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let (month, year) = value
        .trim()
        .split_once('/')
        .ok_or_else(|| invalid("must look like MM/YY"))?;
    let month: u32 = month.parse().map_err(|_| invalid("must look like MM/YY"))?;
    let year: i32 = year.parse().map_err(|_| invalid("must look like MM/YY"))?;
    if !(1..=12).contains(&month) || !(0..=99).contains(&year) {
        return Err(invalid("must look like MM/YY"));
    }

    let year = 2000 + year;
    if (year, month) < (today.year(), today.month()) {
        return Err(invalid("card has expired"));
    }
    Ok(())
}

pub fn card_cvv(field: &str, value: &str) -> ValidationResult {
    let value = value.trim();
    if !(3..=4).contains(&value.len()) || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be 3 or 4 digits".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

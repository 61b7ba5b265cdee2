//! Field checks for the recovery request and the password change that follows it.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Email,
    Phone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldError {
    EmailRequired,
    EmailInvalid,
    PhoneRequired,
    PhoneInvalid,
}

impl FieldError {
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            Self::EmailRequired | Self::EmailInvalid => Field::Email,
            Self::PhoneRequired | Self::PhoneInvalid => Field::Phone,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::EmailRequired => "Email is required",
            Self::EmailInvalid => "Please enter a valid email",
            Self::PhoneRequired => "Phone number is required",
            Self::PhoneInvalid => "Please enter a valid 10-digit phone number",
        };
        f.write_str(message)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PasswordChangeError {
    #[error("Password must be at least 6 characters long")]
    TooShort,
    #[error("Passwords do not match")]
    Mismatch,
}

/// Normalize an email for lookup checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Exactly 10 decimal digits.
#[must_use]
pub fn valid_phone(phone: &str) -> bool {
    Regex::new(r"^\d{10}$").is_ok_and(|regex| regex.is_match(phone))
}

/// Check both fields and report every problem found.
///
/// # Errors
/// Returns the list of field errors when any field is missing or malformed.
pub fn validate_request(email: &str, phone: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if email.is_empty() {
        errors.push(FieldError::EmailRequired);
    } else if !valid_email(email) {
        errors.push(FieldError::EmailInvalid);
    }

    if phone.is_empty() {
        errors.push(FieldError::PhoneRequired);
    } else if !valid_phone(phone) {
        errors.push(FieldError::PhoneInvalid);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a new password and its confirmation.
///
/// # Errors
/// Returns `TooShort` below 6 characters, then `Mismatch` if the two differ.
pub fn validate_password_change(
    new_password: &SecretString,
    confirmation: &SecretString,
) -> Result<(), PasswordChangeError> {
    let new_password = new_password.expose_secret();
    if new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordChangeError::TooShort);
    }
    if new_password != confirmation.expose_secret() {
        return Err(PasswordChangeError::Mismatch);
    }
    Ok(())
}

//! Profile validation

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use validator::ValidateEmail;

/// Errors that can occur during profile validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProfileValidationError {
    #[error("First name cannot be empty")]
    EmptyFirstName,

    #[error("First name cannot exceed {0} characters")]
    FirstNameTooLong(usize),

    #[error("Last name cannot be empty")]
    EmptyLastName,

    #[error("Last name cannot exceed {0} characters")]
    LastNameTooLong(usize),

    #[error("Email address cannot be empty")]
    EmptyEmail,

    #[error("Email address cannot exceed {0} characters")]
    EmailTooLong(usize),

    #[error("Enter a valid email address: '{0}'")]
    InvalidEmail(String),

    #[error("Enter a valid phone number in international format (ex: +12223334444): '{0}'")]
    InvalidPhone(String),

    #[error("Profile description cannot exceed {0} characters")]
    DescriptionTooLong(usize),
}

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_DESCRIPTION_LENGTH: usize = 1500;

/// `+`, a non-zero country code digit, then up to 15 digits in total
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9][0-9]{7,14}$").unwrap());

/// Validate a first name
pub fn validate_first_name(name: &str) -> Result<(), ProfileValidationError> {
    if name.trim().is_empty() {
        return Err(ProfileValidationError::EmptyFirstName);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ProfileValidationError::FirstNameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a last name
pub fn validate_last_name(name: &str) -> Result<(), ProfileValidationError> {
    if name.trim().is_empty() {
        return Err(ProfileValidationError::EmptyLastName);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ProfileValidationError::LastNameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), ProfileValidationError> {
    if email.is_empty() {
        return Err(ProfileValidationError::EmptyEmail);
    }

    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(ProfileValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !email.validate_email() {
        return Err(ProfileValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// Validate a phone number in international (E.164) format
pub fn validate_phone(phone: &str) -> Result<(), ProfileValidationError> {
    if !PHONE_PATTERN.is_match(phone) {
        return Err(ProfileValidationError::InvalidPhone(phone.to_string()));
    }

    Ok(())
}

/// Validate a profile description
pub fn validate_description(description: &str) -> Result<(), ProfileValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ProfileValidationError::DescriptionTooLong(MAX_DESCRIPTION_LENGTH));
    }

    Ok(())
}

//! Account validation rules

use chrono::{Months, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Minimum length for usernames
pub const MIN_USERNAME_LENGTH: usize = 8;

/// Maximum length for usernames (also the column width)
pub const MAX_USERNAME_LENGTH: usize = 20;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Default age requirement in years
pub const DEFAULT_USER_AGE_LIMIT: u32 = 21;

/// Help text shown next to the username field
pub const USERNAME_HELP_TEXT: &str = "usernames must be between 8 and 20 characters long \
and contain only letters, numbers, periods (.), and underscores (_)";

/// Characters allowed anywhere in a username
static USERNAME_CHARSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._]+$").unwrap());

/// Errors that can occur during account validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountValidationError {
    #[error("username must be set")]
    EmptyUsername,

    #[error("password must be set")]
    EmptyPassword,

    #[error("Enter a valid username. Usernames must be at least {0} characters long")]
    UsernameTooShort(usize),

    #[error("Enter a valid username. Usernames cannot exceed {0} characters")]
    UsernameTooLong(usize),

    #[error(
        "Enter a valid username. This value may contain only letters, numbers, and . or _ characters (found '{0}')"
    )]
    InvalidUsernameCharacter(char),

    #[error("Enter a valid username. Usernames cannot start or end with . or _")]
    InvalidUsernameBoundary,

    #[error("Enter a valid username. Usernames cannot contain consecutive . or _ characters")]
    ConsecutiveSeparators,

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),

    #[error("This password is too common.")]
    CommonPassword,

    #[error("{value} does not meet the current birth year: {required}")]
    AgeRestriction { value: NaiveDate, required: NaiveDate },

    #[error("Superuser must have {0}=True")]
    SuperuserFlag(&'static str),
}

impl AccountValidationError {
    /// Machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::EmptyPassword => "required",
            Self::UsernameTooShort(_)
            | Self::UsernameTooLong(_)
            | Self::InvalidUsernameCharacter(_)
            | Self::InvalidUsernameBoundary
            | Self::ConsecutiveSeparators => "invalid_username",
            Self::PasswordTooShort(_) => "password_too_short",
            Self::PasswordTooLong(_) => "password_too_long",
            Self::CommonPassword => "password_too_common",
            Self::AgeRestriction { .. } => "age restriction",
            Self::SuperuserFlag(_) => "superuser_flags",
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '.' || c == '_'
}

/// Validate a username
///
/// Rules:
/// - Between 8 and 20 characters
/// - Only letters, numbers, underscores and periods
/// - Does not start or end with an underscore or period
/// - No consecutive underscores or periods (`__`, `..`, `._`, `_.`)
pub fn validate_username(username: &str) -> Result<(), AccountValidationError> {
    if username.is_empty() {
        return Err(AccountValidationError::EmptyUsername);
    }

    let length = username.chars().count();

    if length < MIN_USERNAME_LENGTH {
        return Err(AccountValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    if length > MAX_USERNAME_LENGTH {
        return Err(AccountValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    if !USERNAME_CHARSET.is_match(username) {
        let invalid = username
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !is_separator(*c))
            .unwrap_or('?');

        return Err(AccountValidationError::InvalidUsernameCharacter(invalid));
    }

    if username.starts_with(is_separator) || username.ends_with(is_separator) {
        return Err(AccountValidationError::InvalidUsernameBoundary);
    }

    let mut prev_separator = false;

    for c in username.chars() {
        let separator = is_separator(c);

        if separator && prev_separator {
            return Err(AccountValidationError::ConsecutiveSeparators);
        }

        prev_separator = separator;
    }

    Ok(())
}

/// Validate password length
///
/// Rules:
/// - Minimum 8 characters
/// - Maximum 128 characters
pub fn validate_password(password: &str) -> Result<(), AccountValidationError> {
    if password.is_empty() {
        return Err(AccountValidationError::EmptyPassword);
    }

    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        return Err(AccountValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(AccountValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Latest date of birth that satisfies `age_limit_years` on `today`
///
/// Feb 29 clamps to Feb 28 in non-leap years.
pub fn birth_date_cutoff(today: NaiveDate, age_limit_years: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(age_limit_years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

/// Validate that `date_of_birth` is at least `age_limit_years` before `today`
pub fn validate_age(
    date_of_birth: NaiveDate,
    age_limit_years: u32,
    today: NaiveDate,
) -> Result<(), AccountValidationError> {
    let required = birth_date_cutoff(today, age_limit_years);

    if date_of_birth > required {
        return Err(AccountValidationError::AgeRestriction {
            value: date_of_birth,
            required,
        });
    }

    Ok(())
}

/// [`validate_age`] against the current UTC date
pub fn validate_age_now(
    date_of_birth: NaiveDate,
    age_limit_years: u32,
) -> Result<(), AccountValidationError> {
    validate_age(date_of_birth, age_limit_years, Utc::now().date_naive())
}

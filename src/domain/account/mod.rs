//! Account domain
//!
//! The authenticated-user entity, its flags, the username/password/age
//! validation rules and the repository trait used to persist accounts.

mod entity;
mod repository;
mod validation;

pub use entity::{Account, AccountFlags, AccountId, ExtraFields, UNUSABLE_PASSWORD_PREFIX};
pub use repository::AccountRepository;
pub use validation::{
    birth_date_cutoff, validate_age, validate_age_now, validate_password, validate_username,
    AccountValidationError, DEFAULT_USER_AGE_LIMIT, MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH,
    USERNAME_HELP_TEXT,
};

#[cfg(test)]
pub use repository::mock::MockAccountRepository;

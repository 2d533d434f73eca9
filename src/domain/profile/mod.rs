//! Profile domain
//!
//! Personal information attached one-to-one to an account.

mod entity;
mod repository;
mod validation;

pub use entity::{AccountProfile, ProfileDetails, DEFAULT_PROFILE_PIC};
pub use repository::ProfileRepository;
pub use validation::{
    validate_description, validate_email, validate_first_name, validate_last_name,
    validate_phone, ProfileValidationError, MAX_DESCRIPTION_LENGTH, MAX_EMAIL_LENGTH,
    MAX_NAME_LENGTH,
};

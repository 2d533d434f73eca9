//! Domain layer - Core entities, validation rules and repository traits

pub mod account;
pub mod error;
pub mod profile;
pub mod utils;

pub use account::{
    Account, AccountFlags, AccountId, AccountRepository, AccountValidationError, ExtraFields,
};
pub use error::DomainError;
pub use profile::{AccountProfile, ProfileDetails, ProfileRepository, ProfileValidationError};

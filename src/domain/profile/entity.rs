//! Account profile entity

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_description, validate_email, validate_first_name, validate_last_name,
    validate_phone, ProfileValidationError,
};
use crate::domain::account::Account;
use crate::domain::utils::{format_name, user_profile_media};

/// Image used when a profile has no picture of its own
pub const DEFAULT_PROFILE_PIC: &str = "accounts/profile_image.png";

/// Editable personal information of a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl ProfileDetails {
    /// Check every field against the profile rules
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        validate_first_name(&self.first_name)?;
        validate_last_name(&self.last_name)?;
        validate_email(&self.email)?;

        if let Some(phone) = self.phone.as_deref().filter(|p| !p.is_empty()) {
            validate_phone(phone)?;
        }

        if let Some(description) = &self.description {
            validate_description(description)?;
        }

        Ok(())
    }
}

/// Personal information associated with an [`Account`]
///
/// Holds the user's name, contact information, public visibility and
/// profile picture. Exactly one profile exists per account and it is
/// deleted with the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    /// Username of the owning account
    account: String,
    /// Profile link, always the owning account's slug
    slug: String,
    first_name: String,
    last_name: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_pic: Option<String>,
}

impl AccountProfile {
    /// Create a profile for `account`
    pub fn new(account: &Account, details: ProfileDetails) -> Self {
        Self {
            account: account.username().to_string(),
            slug: account.slug().to_string(),
            first_name: details.first_name,
            last_name: details.last_name,
            email: details.email,
            phone: details.phone.filter(|p| !p.is_empty()),
            is_public: details.is_public,
            description: details.description,
            profile_pic: Some(DEFAULT_PROFILE_PIC.to_string()),
        }
    }

    /// Rebuild a profile from persisted state
    pub fn restore(
        account: impl Into<String>,
        slug: impl Into<String>,
        details: ProfileDetails,
        profile_pic: Option<String>,
    ) -> Self {
        Self {
            account: account.into(),
            slug: slug.into(),
            first_name: details.first_name,
            last_name: details.last_name,
            email: details.email,
            phone: details.phone,
            is_public: details.is_public,
            description: details.description,
            profile_pic,
        }
    }

    // Getters

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn profile_pic(&self) -> Option<&str> {
        self.profile_pic.as_deref()
    }

    pub fn details(&self) -> ProfileDetails {
        ProfileDetails {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            description: self.description.clone(),
            is_public: self.is_public,
        }
    }

    /// First initial and formatted last name, e.g. `"N User"`
    pub fn short_name(&self) -> String {
        let initial: String = self
            .first_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default();

        format!("{} {}", initial, format_name(&self.last_name))
    }

    /// Formatted first and last name, e.g. `"Normal User"`
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            format_name(&self.first_name),
            format_name(&self.last_name)
        )
    }

    /// Path of the profile detail page
    pub fn absolute_url(&self) -> String {
        format!("/profiles/{}/", self.slug)
    }

    /// Storage path for an uploaded profile picture
    pub fn profile_pic_upload_path(&self, filename: &str) -> String {
        user_profile_media(&self.account, filename)
    }

    // Mutators

    /// Replace the editable fields
    pub fn set_details(&mut self, details: ProfileDetails) {
        self.first_name = details.first_name;
        self.last_name = details.last_name;
        self.email = details.email;
        self.phone = details.phone.filter(|p| !p.is_empty());
        self.description = details.description;
        self.is_public = details.is_public;
    }

    pub fn set_profile_pic(&mut self, path: Option<String>) {
        self.profile_pic = path;
    }

    /// Refresh the slug from the owning account; run before every save
    pub fn sync_slug(&mut self, account: &Account) {
        self.account = account.username().to_string();
        self.slug = account.slug().to_string();
    }

    /// Default ordering: `last_name`, then `first_name`
    pub fn ordering(a: &AccountProfile, b: &AccountProfile) -> Ordering {
        a.last_name
            .cmp(&b.last_name)
            .then_with(|| a.first_name.cmp(&b.first_name))
    }
}

impl std::fmt::Display for AccountProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.account)
    }
}

//! Account entity and related types

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::utils::{bool_label, normalize_username};

/// Prefix marking a password hash that can never verify
pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

/// Account identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a new random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolved permission and status flags of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFlags {
    /// Grants access to the admin site
    pub is_staff: bool,
    /// Grants unrestricted access to everything
    pub is_superuser: bool,
    /// Grants login access
    pub is_active: bool,
    /// Is old enough to use the app
    pub is_of_age: bool,
}

impl Default for AccountFlags {
    fn default() -> Self {
        Self {
            is_staff: false,
            is_superuser: false,
            is_active: true,
            is_of_age: false,
        }
    }
}

/// Optional flag overrides passed to the account manager
///
/// A `None` field falls back to the default of whichever creation path is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ExtraFields {
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
    pub is_of_age: Option<bool>,
}

impl ExtraFields {
    pub fn staff() -> Self {
        Self {
            is_staff: Some(true),
            ..Self::default()
        }
    }

    /// Fill unset fields from `defaults`
    pub fn resolve(&self, defaults: AccountFlags) -> AccountFlags {
        AccountFlags {
            is_staff: self.is_staff.unwrap_or(defaults.is_staff),
            is_superuser: self.is_superuser.unwrap_or(defaults.is_superuser),
            is_active: self.is_active.unwrap_or(defaults.is_active),
            is_of_age: self.is_of_age.unwrap_or(defaults.is_of_age),
        }
    }
}

/// User account used for authentication
///
/// Be careful granting `is_staff` or `is_superuser`: those accounts can make
/// irrevocable changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    /// Unique, normalized login name
    username: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
    is_staff: bool,
    is_superuser: bool,
    is_active: bool,
    is_of_age: bool,
    /// When the account was added to the site
    date_joined: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new account joined now
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        flags: AccountFlags,
    ) -> Self {
        Self {
            id: AccountId::generate(),
            username: username.into(),
            password_hash: password_hash.into(),
            is_staff: flags.is_staff,
            is_superuser: flags.is_superuser,
            is_active: flags.is_active,
            is_of_age: flags.is_of_age,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    /// Rebuild an account from persisted state
    pub fn restore(
        id: AccountId,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        flags: AccountFlags,
        date_joined: DateTime<Utc>,
        last_login: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            is_staff: flags.is_staff,
            is_superuser: flags.is_superuser,
            is_active: flags.is_active,
            is_of_age: flags.is_of_age,
            date_joined,
            last_login,
        }
    }

    // Getters

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_of_age(&self) -> bool {
        self.is_of_age
    }

    pub fn flags(&self) -> AccountFlags {
        AccountFlags {
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            is_active: self.is_active,
            is_of_age: self.is_of_age,
        }
    }

    pub fn date_joined(&self) -> DateTime<Utc> {
        self.date_joined
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    /// The account status as `"active"` or `"inactive"`
    pub fn status(&self) -> &'static str {
        bool_label(self.is_active)
    }

    /// URL slug for the account
    pub fn slug(&self) -> &str {
        &self.username
    }

    /// Path of the account detail page
    pub fn absolute_url(&self) -> String {
        format!("/accounts/{}/", self.slug())
    }

    /// Whether the stored hash can ever verify a password
    pub fn has_usable_password(&self) -> bool {
        !self.password_hash.is_empty() && !self.password_hash.starts_with(UNUSABLE_PASSWORD_PREFIX)
    }

    // Mutators

    /// Normalize the username; run before every save
    pub fn normalize(&mut self) {
        self.username = normalize_username(&self.username);
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
    }

    /// Replace the hash with a marker that never verifies
    pub fn set_unusable_password(&mut self) {
        self.password_hash = format!("{}{}", UNUSABLE_PASSWORD_PREFIX, Uuid::new_v4().simple());
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    pub fn set_of_age(&mut self, of_age: bool) {
        self.is_of_age = of_age;
    }

    /// Record a login
    pub fn record_login(&mut self) {
        self.last_login = Some(Utc::now());
    }

    /// Default ordering: `date_joined`, then `is_active`
    pub fn ordering(a: &Account, b: &Account) -> Ordering {
        a.date_joined
            .cmp(&b.date_joined)
            .then(a.is_active.cmp(&b.is_active))
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_account(username: &str) -> Account {
        Account::new(username, "hashed_password", AccountFlags::default())
    }

    #[test]
    fn test_account_defaults() {
        let account = create_test_account("normie");

        assert_eq!(account.username(), "normie");
        assert!(!account.is_staff());
        assert!(!account.is_superuser());
        assert!(account.is_active());
        assert!(!account.is_of_age());
        assert!(account.last_login().is_none());
        assert!(account.date_joined() <= Utc::now());
    }

    #[test]
    fn test_account_display_and_slug() {
        let account = create_test_account("normie");

        assert_eq!(account.to_string(), "normie");
        assert_eq!(account.slug(), "normie");
        assert_eq!(account.absolute_url(), "/accounts/normie/");
    }

    #[test]
    fn test_account_status() {
        let mut account = create_test_account("normie");
        assert_eq!(account.status(), "active");

        account.set_active(false);
        assert_eq!(account.status(), "inactive");
    }

    #[test]
    fn test_normalize() {
        let mut account = create_test_account("  Some User ");
        account.normalize();
        assert_eq!(account.username(), "some_user");
    }

    #[test]
    fn test_usable_password() {
        let mut account = create_test_account("normie");
        assert!(account.has_usable_password());

        account.set_unusable_password();
        assert!(!account.has_usable_password());
        assert!(account.password_hash().starts_with(UNUSABLE_PASSWORD_PREFIX));

        account.set_password_hash("");
        assert!(!account.has_usable_password());
    }

    #[test]
    fn test_extra_fields_resolve() {
        let flags = ExtraFields::staff().resolve(AccountFlags::default());

        assert!(flags.is_staff);
        assert!(!flags.is_superuser);
        assert!(flags.is_active);
        assert!(!flags.is_of_age);

        let overridden = ExtraFields {
            is_active: Some(false),
            ..ExtraFields::default()
        }
        .resolve(AccountFlags::default());
        assert!(!overridden.is_active);
    }

    #[test]
    fn test_record_login() {
        let mut account = create_test_account("normie");
        account.record_login();
        assert!(account.last_login().is_some());
    }

    #[test]
    fn test_ordering() {
        let now = Utc::now();
        let older = Account::restore(
            AccountId::generate(),
            "older",
            "hash",
            AccountFlags::default(),
            now - Duration::days(1),
            None,
        );
        let newer = Account::restore(
            AccountId::generate(),
            "newer",
            "hash",
            AccountFlags::default(),
            now,
            None,
        );

        let mut accounts = vec![newer, older];
        accounts.sort_by(Account::ordering);

        assert_eq!(accounts[0].username(), "older");
        assert_eq!(accounts[1].username(), "newer");
    }

    #[test]
    fn test_serialization_excludes_password() {
        let account = create_test_account("normie");

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("\"username\":\"normie\""));
    }
}

//! Profile service for managing the personal information of accounts

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::account::{Account, AccountRepository};
use crate::domain::profile::{AccountProfile, ProfileDetails, ProfileRepository};
use crate::domain::DomainError;

/// Profile service
#[derive(Debug)]
pub struct ProfileService<P: ProfileRepository, A: AccountRepository> {
    repository: Arc<P>,
    accounts: Arc<A>,
}

impl<P: ProfileRepository, A: AccountRepository> ProfileService<P, A> {
    /// Create a new profile service
    pub fn new(repository: Arc<P>, accounts: Arc<A>) -> Self {
        Self {
            repository,
            accounts,
        }
    }

    async fn require_account(&self, username: &str) -> Result<Account, DomainError> {
        self.accounts
            .get(username)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Account '{}' not found", username)))
    }

    async fn require(&self, username: &str) -> Result<AccountProfile, DomainError> {
        self.repository.get(username).await?.ok_or_else(|| {
            DomainError::not_found(format!("Profile for account '{}' not found", username))
        })
    }

    async fn ensure_email_free(&self, email: &str, owner: &str) -> Result<(), DomainError> {
        match self.repository.get_by_email(email).await? {
            Some(existing) if existing.account() != owner => Err(DomainError::conflict(format!(
                "Email '{}' is already in use",
                email
            ))),
            _ => Ok(()),
        }
    }

    /// Create the profile of an existing account
    pub async fn create(
        &self,
        username: &str,
        details: ProfileDetails,
    ) -> Result<AccountProfile, DomainError> {
        let account = self.require_account(username).await?;

        details
            .validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.get(account.username()).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Account '{}' already has a profile",
                account.username()
            )));
        }

        self.ensure_email_free(&details.email, account.username())
            .await?;

        let profile = self
            .repository
            .create(AccountProfile::new(&account, details))
            .await?;
        info!(account = %profile.account(), "Profile created");

        Ok(profile)
    }

    /// Get the profile of an account
    pub async fn get(&self, username: &str) -> Result<Option<AccountProfile>, DomainError> {
        self.repository.get(username).await
    }

    /// Get a profile by slug, whatever its visibility
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<AccountProfile>, DomainError> {
        self.repository.get_by_slug(slug).await
    }

    /// Get a profile by slug only when it is public
    pub async fn get_public(&self, slug: &str) -> Result<Option<AccountProfile>, DomainError> {
        let profile = self.repository.get_by_slug(slug).await?;

        Ok(profile.filter(AccountProfile::is_public))
    }

    /// List every profile
    pub async fn list(&self) -> Result<Vec<AccountProfile>, DomainError> {
        self.repository.list(false).await
    }

    /// List public profiles
    pub async fn list_public(&self) -> Result<Vec<AccountProfile>, DomainError> {
        self.repository.list(true).await
    }

    /// Replace the editable fields of a profile
    pub async fn update(
        &self,
        username: &str,
        details: ProfileDetails,
    ) -> Result<AccountProfile, DomainError> {
        let account = self.require_account(username).await?;
        let mut profile = self.require(username).await?;

        details
            .validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.ensure_email_free(&details.email, username).await?;

        profile.set_details(details);
        profile.sync_slug(&account);

        let profile = self.repository.update(&profile).await?;
        debug!(account = %username, "Profile updated");

        Ok(profile)
    }

    /// Point the profile picture at an uploaded file
    pub async fn set_profile_pic(
        &self,
        username: &str,
        filename: &str,
    ) -> Result<AccountProfile, DomainError> {
        let mut profile = self.require(username).await?;

        let path = profile.profile_pic_upload_path(filename);
        profile.set_profile_pic(Some(path));

        self.repository.update(&profile).await
    }

    /// Delete the profile of an account
    pub async fn delete(&self, username: &str) -> Result<bool, DomainError> {
        let deleted = self.repository.delete(username).await?;

        if deleted {
            info!(account = %username, "Profile deleted");
        }

        Ok(deleted)
    }

    /// Profile of the most recently joined account
    pub async fn latest(&self) -> Result<Option<AccountProfile>, DomainError> {
        let accounts = self.accounts.list(None).await?;

        for account in accounts.iter().rev() {
            if let Some(profile) = self.repository.get(account.username()).await? {
                return Ok(Some(profile));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{AccountFlags, AccountId};
    use crate::infrastructure::account::InMemoryAccountRepository;
    use crate::infrastructure::profile::InMemoryProfileRepository;
    use chrono::{Duration, Utc};

    type TestService = ProfileService<InMemoryProfileRepository, InMemoryAccountRepository>;

    fn details(first: &str, last: &str, email: &str) -> ProfileDetails {
        ProfileDetails {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone: Some("+18044448888".to_string()),
            description: Some("I am a pot grower!".to_string()),
            is_public: false,
        }
    }

    fn normal_details() -> ProfileDetails {
        details("Normal", "User", "normaluser@test.dev")
    }

    async fn create_service(usernames: &[&str]) -> TestService {
        let accounts = Arc::new(InMemoryAccountRepository::new());

        for username in usernames {
            accounts
                .create(Account::new(*username, "hash", AccountFlags::default()))
                .await
                .unwrap();
        }

        ProfileService::new(Arc::new(InMemoryProfileRepository::new()), accounts)
    }

    #[tokio::test]
    async fn test_profile_requires_account() {
        let service = create_service(&[]).await;

        let result = service.create("normie", normal_details()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_profile() {
        let service = create_service(&["normie"]).await;

        let profile = service.create("normie", normal_details()).await.unwrap();

        assert_eq!(profile.first_name(), "Normal");
        assert_eq!(profile.last_name(), "User");
        assert_eq!(profile.slug(), "normie");
        assert!(!profile.is_public());
        assert_eq!(profile.short_name(), "N User");
        assert_eq!(profile.full_name(), "Normal User");
        assert_eq!(profile.absolute_url(), "/profiles/normie/");
    }

    #[tokio::test]
    async fn test_create_validates_details() {
        let service = create_service(&["normie"]).await;

        let result = service
            .create("normie", details("Normal", "User", "not-an-email"))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let mut bad_phone = normal_details();
        bad_phone.phone = Some("555-1234".to_string());
        let result = service.create("normie", bad_phone).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_one_profile_per_account() {
        let service = create_service(&["normie"]).await;
        service.create("normie", normal_details()).await.unwrap();

        let result = service
            .create("normie", details("Other", "Name", "other@test.dev"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_email_must_be_unique() {
        let service = create_service(&["normie", "staffuser"]).await;
        service.create("normie", normal_details()).await.unwrap();

        let result = service
            .create("staffuser", details("Staff", "User", "normaluser@test.dev"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_public_visibility() {
        let service = create_service(&["normie", "staffuser"]).await;
        service.create("normie", normal_details()).await.unwrap();

        let mut public = details("Staff", "User", "staffuser@test.dev");
        public.is_public = true;
        service.create("staffuser", public).await.unwrap();

        assert!(service.get_public("normie").await.unwrap().is_none());
        assert!(service.get_by_slug("normie").await.unwrap().is_some());
        assert!(service.get_public("staffuser").await.unwrap().is_some());

        assert_eq!(service.list().await.unwrap().len(), 2);
        let public = service.list_public().await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].account(), "staffuser");
    }

    #[tokio::test]
    async fn test_update_profile() {
        let service = create_service(&["normie"]).await;
        service.create("normie", normal_details()).await.unwrap();

        let mut updated = details("Norma", "Grower", "norma@test.dev");
        updated.is_public = true;
        updated.phone = Some(String::new());

        let profile = service.update("normie", updated).await.unwrap();

        assert_eq!(profile.full_name(), "Norma Grower");
        assert_eq!(profile.email(), "norma@test.dev");
        assert!(profile.is_public());
        assert!(profile.phone().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_profile() {
        let service = create_service(&["normie"]).await;

        let result = service.update("normie", normal_details()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_set_profile_pic() {
        let service = create_service(&["normie"]).await;
        service.create("normie", normal_details()).await.unwrap();

        let profile = service.set_profile_pic("normie", "me.jpg").await.unwrap();
        assert_eq!(profile.profile_pic(), Some("users/profile/normie/me.jpg"));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = create_service(&["normie"]).await;
        service.create("normie", normal_details()).await.unwrap();

        assert!(service.delete("normie").await.unwrap());
        assert!(service.get("normie").await.unwrap().is_none());
        assert!(!service.delete("normie").await.unwrap());
    }

    #[tokio::test]
    async fn test_latest_follows_date_joined() {
        let accounts = Arc::new(InMemoryAccountRepository::with_accounts(vec![
            Account::restore(
                AccountId::generate(),
                "newcomer",
                "hash",
                AccountFlags::default(),
                Utc::now(),
                None,
            ),
            Account::restore(
                AccountId::generate(),
                "old_timer",
                "hash",
                AccountFlags::default(),
                Utc::now() - Duration::days(365),
                None,
            ),
        ]));
        let service = ProfileService::new(Arc::new(InMemoryProfileRepository::new()), accounts);

        assert!(service.latest().await.unwrap().is_none());

        service
            .create("old_timer", details("Old", "Timer", "old@test.dev"))
            .await
            .unwrap();
        assert_eq!(service.latest().await.unwrap().unwrap().account(), "old_timer");

        service
            .create("newcomer", details("New", "Comer", "new@test.dev"))
            .await
            .unwrap();
        assert_eq!(service.latest().await.unwrap().unwrap().account(), "newcomer");
    }
}

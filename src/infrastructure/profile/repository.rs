//! In-memory profile repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::profile::{AccountProfile, ProfileRepository};
use crate::domain::DomainError;

/// In-memory implementation of ProfileRepository
#[derive(Debug)]
pub struct InMemoryProfileRepository {
    /// Profiles keyed by account username
    profiles: Arc<RwLock<HashMap<String, AccountProfile>>>,
}

impl InMemoryProfileRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn email_taken(
    profiles: &HashMap<String, AccountProfile>,
    email: &str,
    owner: &str,
) -> bool {
    profiles
        .values()
        .any(|p| p.email() == email && p.account() != owner)
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn get(&self, account: &str) -> Result<Option<AccountProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(account).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<AccountProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.values().find(|p| p.slug() == slug).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<AccountProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.values().find(|p| p.email() == email).cloned())
    }

    async fn create(&self, profile: AccountProfile) -> Result<AccountProfile, DomainError> {
        let mut profiles = self.profiles.write().await;

        if profiles.contains_key(profile.account()) {
            return Err(DomainError::conflict(format!(
                "Account '{}' already has a profile",
                profile.account()
            )));
        }

        if email_taken(&profiles, profile.email(), profile.account()) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already in use",
                profile.email()
            )));
        }

        profiles.insert(profile.account().to_string(), profile.clone());

        Ok(profile)
    }

    async fn update(&self, profile: &AccountProfile) -> Result<AccountProfile, DomainError> {
        let mut profiles = self.profiles.write().await;

        if !profiles.contains_key(profile.account()) {
            return Err(DomainError::not_found(format!(
                "Profile for account '{}' not found",
                profile.account()
            )));
        }

        if email_taken(&profiles, profile.email(), profile.account()) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already in use",
                profile.email()
            )));
        }

        profiles.insert(profile.account().to_string(), profile.clone());

        Ok(profile.clone())
    }

    async fn delete(&self, account: &str) -> Result<bool, DomainError> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.remove(account).is_some())
    }

    async fn list(&self, public_only: bool) -> Result<Vec<AccountProfile>, DomainError> {
        let profiles = self.profiles.read().await;

        let mut result: Vec<AccountProfile> = profiles
            .values()
            .filter(|p| !public_only || p.is_public())
            .cloned()
            .collect();

        result.sort_by(AccountProfile::ordering);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{Account, AccountFlags};
    use crate::domain::profile::ProfileDetails;

    fn create_test_profile(username: &str, last_name: &str, is_public: bool) -> AccountProfile {
        let account = Account::new(username, "hash", AccountFlags::default());
        let details = ProfileDetails {
            first_name: "Test".to_string(),
            last_name: last_name.to_string(),
            email: format!("{}@test.dev", username),
            phone: None,
            description: None,
            is_public,
        };
        AccountProfile::new(&account, details)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryProfileRepository::new();
        repo.create(create_test_profile("normie", "User", false))
            .await
            .unwrap();

        let profile = repo.get("normie").await.unwrap().unwrap();
        assert_eq!(profile.email(), "normie@test.dev");

        assert!(repo.get_by_slug("normie").await.unwrap().is_some());
        assert!(repo.get_by_email("normie@test.dev").await.unwrap().is_some());
        assert!(repo.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_one_profile_per_account() {
        let repo = InMemoryProfileRepository::new();
        repo.create(create_test_profile("normie", "User", false))
            .await
            .unwrap();

        let result = repo.create(create_test_profile("normie", "Other", true)).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_unique_email() {
        let repo = InMemoryProfileRepository::new();
        repo.create(create_test_profile("normie", "User", false))
            .await
            .unwrap();

        let mut other = create_test_profile("staffuser", "Staff", false);
        let mut details = other.details();
        details.email = "normie@test.dev".to_string();
        other.set_details(details);

        let result = repo.create(other.clone()).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));

        // Keeping your own email on update is fine
        let own = repo.get("normie").await.unwrap().unwrap();
        assert!(repo.update(&own).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_profile() {
        let repo = InMemoryProfileRepository::new();

        let result = repo.update(&create_test_profile("normie", "User", false)).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_ordering_and_visibility() {
        let repo = InMemoryProfileRepository::new();
        repo.create(create_test_profile("zed_user", "Zed", true))
            .await
            .unwrap();
        repo.create(create_test_profile("abe_user", "Abe", false))
            .await
            .unwrap();
        repo.create(create_test_profile("max_user", "Max", true))
            .await
            .unwrap();

        let all = repo.list(false).await.unwrap();
        let names: Vec<&str> = all.iter().map(|p| p.last_name()).collect();
        assert_eq!(names, vec!["Abe", "Max", "Zed"]);

        let public = repo.list(true).await.unwrap();
        assert_eq!(public.len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryProfileRepository::new();
        repo.create(create_test_profile("normie", "User", false))
            .await
            .unwrap();

        assert!(repo.delete("normie").await.unwrap());
        assert!(!repo.delete("normie").await.unwrap());
    }
}

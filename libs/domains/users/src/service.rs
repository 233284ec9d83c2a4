use axum_helpers::Role;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{UpdateProfile, UserProfile};
use crate::repository::UserRepository;

/// Profile and account administration
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, id: &str) -> UserResult<UserProfile> {
        self.repository
            .find_by_id(id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, input))]
    pub async fn update_profile(&self, id: &str, input: UpdateProfile) -> UserResult<UserProfile> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;
        let name = input.name.trim();
        if name.is_empty() {
            return Err(UserError::Validation("name must not be blank".to_string()));
        }

        let user = self
            .repository
            .update_name(id, name)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        tracing::info!(user_id = %id, "Profile updated");
        Ok(UserProfile::from(user))
    }

    pub async fn list_users(&self) -> UserResult<Vec<UserProfile>> {
        let users = self.repository.list().await?;
        Ok(users.iter().map(UserProfile::from).collect())
    }

    pub async fn count_users(&self) -> UserResult<u64> {
        self.repository.count(None).await
    }

    pub async fn count_admins(&self) -> UserResult<u64> {
        self.repository.count(Some(Role::Admin)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthProvider, User};
    use crate::repository::MockUserRepository;
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq("missing"))
            .returning(|_| Ok(None));

        let err = UserService::new(repo).get_profile("missing").await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_profile_trims_name() {
        let mut repo = MockUserRepository::new();
        repo.expect_update_name()
            .with(eq("u-1"), eq("Jane"))
            .times(1)
            .returning(|_, name| {
                let mut user = User::new("j@shop.com", name, Role::User, AuthProvider::Google);
                user.id = "u-1".into();
                Ok(Some(user))
            });

        let profile = UserService::new(repo)
            .update_profile("u-1", UpdateProfile { name: "  Jane ".into() })
            .await
            .unwrap();
        assert_eq!(profile.name, "Jane");
    }

    #[tokio::test]
    async fn test_update_profile_rejects_empty_name() {
        let mut repo = MockUserRepository::new();
        repo.expect_update_name().never();

        let err = UserService::new(repo)
            .update_profile("u-1", UpdateProfile { name: String::new() })
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Validation(_)));
    }

    #[tokio::test]
    async fn test_count_admins_filters_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_count()
            .with(eq(Some(Role::Admin)))
            .returning(|_| Ok(2));

        assert_eq!(UserService::new(repo).count_admins().await.unwrap(), 2);
    }
}

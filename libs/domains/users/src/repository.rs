use async_trait::async_trait;
use axum_helpers::Role;

use crate::error::UserResult;
use crate::models::User;

/// Account storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> UserResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn find_by_google_id(&self, google_id: &str) -> UserResult<Option<User>>;

    async fn find_by_session_token(&self, token: &str) -> UserResult<Option<User>>;

    /// Insert or replace the record with the same id.
    async fn save(&self, user: &User) -> UserResult<()>;

    /// Unset the session token and expiry. Returns false if no such user.
    async fn clear_session(&self, id: &str) -> UserResult<bool>;

    async fn update_name(&self, id: &str, name: &str) -> UserResult<Option<User>>;

    /// All accounts, newest first.
    async fn list(&self) -> UserResult<Vec<User>>;

    async fn count(&self, role: Option<Role>) -> UserResult<u64>;
}

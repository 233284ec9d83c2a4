//! In-memory UserRepository for tests and local runs without MongoDB.

use async_trait::async_trait;
use axum_helpers::Role;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::UserResult;
use crate::models::User;
use crate::repository::UserRepository;

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    pub async fn snapshot(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    async fn find_where(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users.read().await.iter().find(|u| pred(u)).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> UserResult<Option<User>> {
        Ok(self.find_where(|u| u.id == id).await)
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.find_where(|u| u.email == email).await)
    }

    async fn find_by_google_id(&self, google_id: &str) -> UserResult<Option<User>> {
        Ok(self
            .find_where(|u| u.google_id.as_deref() == Some(google_id))
            .await)
    }

    async fn find_by_session_token(&self, token: &str) -> UserResult<Option<User>> {
        Ok(self
            .find_where(|u| u.session_token.as_deref() == Some(token))
            .await)
    }

    async fn save(&self, user: &User) -> UserResult<()> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(())
    }

    async fn clear_session(&self, id: &str) -> UserResult<bool> {
        let mut users = self.users.write().await;
        Ok(users
            .iter_mut()
            .find(|u| u.id == id)
            .map(|u| {
                u.session_token = None;
                u.session_expires = None;
            })
            .is_some())
    }

    async fn update_name(&self, id: &str, name: &str) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.id == id).map(|u| {
            u.name = name.to_string();
            u.clone()
        }))
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let mut users = self.users.read().await.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn count(&self, role: Option<Role>) -> UserResult<u64> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .count() as u64)
    }
}

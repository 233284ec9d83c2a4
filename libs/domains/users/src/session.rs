//! Session-token authentication backed by an external session service.
//!
//! The client completes login with the hosted auth service, then posts the
//! resulting session id here. We look the id up with the service, upsert the
//! account by email and hand back an opaque token that lives on the user
//! record until it expires or the user logs out.

use async_trait::async_trait;
use axum_helpers::{AppError, AuthPrincipal, PrincipalResolver, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{UserError, UserResult};
use crate::models::{AuthProvider, User, UserProfile, timestamp};
use crate::repository::UserRepository;

pub const SESSION_HEADER: &str = "X-Session-ID";

/// Identity reported by the session service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionIdentity {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionDataSource: Send + Sync {
    /// `Err(InvalidSession)` when the service does not know the id.
    async fn fetch(&self, session_id: &str) -> UserResult<SessionIdentity>;
}

pub struct HttpSessionSource {
    url: String,
    http_client: reqwest::Client,
}

impl HttpSessionSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SessionDataSource for HttpSessionSource {
    async fn fetch(&self, session_id: &str) -> UserResult<SessionIdentity> {
        let response = self
            .http_client
            .get(&self.url)
            .header(SESSION_HEADER, session_id)
            .send()
            .await
            .map_err(|e| UserError::Upstream(format!("Session service unreachable: {}", e)))?;

        if !response.status().is_success() {
            tracing::info!(status = %response.status(), "Session service rejected session id");
            return Err(UserError::InvalidSession);
        }

        response
            .json()
            .await
            .map_err(|e| UserError::Upstream(format!("Malformed session data: {}", e)))
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SessionLoginRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionLoginResponse {
    pub user: UserProfile,
    pub session_token: String,
    pub message: String,
}

pub struct SessionStrategy<R: UserRepository> {
    users: Arc<R>,
    source: Arc<dyn SessionDataSource>,
    config: SessionConfig,
}

impl<R: UserRepository> SessionStrategy<R> {
    pub fn new(users: Arc<R>, source: Arc<dyn SessionDataSource>, config: SessionConfig) -> Self {
        Self {
            users,
            source,
            config,
        }
    }

    pub fn from_config(users: Arc<R>, config: SessionConfig) -> Self {
        let source = Arc::new(HttpSessionSource::new(config.service_url.clone()));
        Self::new(users, source, config)
    }

    /// Exchanges a session id for a fresh session token. Existing accounts
    /// keep their role; new ones are admin only if listed in the config.
    #[instrument(skip_all)]
    pub async fn login(&self, session_id: &str) -> UserResult<SessionLoginResponse> {
        let identity = self.source.fetch(session_id).await?;
        let now = timestamp::now();

        let mut user = match self.users.find_by_email(&identity.email).await? {
            Some(mut existing) => {
                existing.name = identity.name;
                existing.picture = identity.picture;
                existing
            }
            None => {
                let role = if self.config.is_admin_email(&identity.email) {
                    Role::Admin
                } else {
                    Role::User
                };
                let mut user =
                    User::new(identity.email, identity.name, role, AuthProvider::Session);
                user.picture = identity.picture;
                tracing::info!(user_id = %user.id, role = %role, "Account created from session");
                user
            }
        };

        let session_token = Uuid::new_v4().to_string();
        user.session_token = Some(session_token.clone());
        user.session_expires = Some(now + self.config.ttl);
        user.last_login = Some(now);
        self.users.save(&user).await?;

        tracing::info!(user_id = %user.id, "Session issued");
        Ok(SessionLoginResponse {
            user: UserProfile::from(&user),
            session_token,
            message: "Authentication successful".to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn logout(&self, user_id: &str) -> UserResult<()> {
        self.users.clear_session(user_id).await?;
        tracing::info!(user_id = %user_id, "Session cleared");
        Ok(())
    }

    /// Looks up a session token. Expired sessions are cleared and resolve to
    /// nothing, as do disabled accounts.
    pub async fn user_for_token(&self, token: &str) -> UserResult<Option<User>> {
        let Some(user) = self.users.find_by_session_token(token).await? else {
            return Ok(None);
        };

        if !user.session_valid_at(timestamp::now()) {
            tracing::debug!(user_id = %user.id, "Session expired");
            self.users.clear_session(&user.id).await?;
            return Ok(None);
        }

        Ok(Some(user).filter(|u| u.is_active))
    }
}

#[async_trait]
impl<R: UserRepository> PrincipalResolver for SessionStrategy<R> {
    async fn resolve(&self, token: &str) -> Result<Option<AuthPrincipal>, AppError> {
        let user = self.user_for_token(token).await?;
        Ok(user.as_ref().map(User::principal))
    }
}

//! Google sign-in that ends in a stateless HS256 bearer token.
//!
//! Browsers go through the authorization-code flow with PKCE and land back
//! on the frontend with `?token=`. Mobile clients already hold a Google
//! access token and trade it directly.

use async_trait::async_trait;
use axum_helpers::{AppError, AuthPrincipal, JwtCodec, JwtConfig, PrincipalResolver, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use url::Url;
use utoipa::ToSchema;

use crate::config::GoogleConfig;
use crate::error::{UserError, UserResult};
use crate::models::{AuthProvider, User, UserProfile, timestamp};
use crate::oauth::{
    GoogleProvider, OAuthCallbackParams, OAuthProvider, OAuthState, OAuthStateManager,
    OAuthUserInfo,
};
use crate::repository::UserRepository;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MobileLoginRequest {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenLoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserProfile,
}

pub struct JwtStrategy<R: UserRepository> {
    users: Arc<R>,
    provider: Arc<dyn OAuthProvider>,
    states: OAuthStateManager,
    codec: JwtCodec,
    google: GoogleConfig,
}

impl<R: UserRepository> JwtStrategy<R> {
    pub fn new(
        users: Arc<R>,
        provider: Arc<dyn OAuthProvider>,
        codec: JwtCodec,
        google: GoogleConfig,
    ) -> Self {
        Self {
            users,
            provider,
            states: OAuthStateManager::new(),
            codec,
            google,
        }
    }

    pub fn from_config(users: Arc<R>, jwt: &JwtConfig, google: GoogleConfig) -> Self {
        let provider = Arc::new(GoogleProvider::new(
            google.client_id.clone(),
            google.client_secret.clone(),
        ));
        Self::new(users, provider, JwtCodec::new(jwt), google)
    }

    /// Starts a browser login: records the state and PKCE verifier and
    /// returns the consent URL to redirect to.
    pub async fn authorize_url(&self) -> UserResult<String> {
        let pending = OAuthState {
            state: self.states.generate_state(),
            pkce_verifier: self.states.generate_pkce_verifier(),
            redirect_uri: self.google.redirect_uri.clone(),
        };
        let url = self.provider.authorize_url(
            &pending.state,
            &pending.pkce_verifier,
            &pending.redirect_uri,
        )?;
        self.states.store_state(pending).await;
        Ok(url)
    }

    /// Completes a browser login and returns the issued token.
    #[instrument(skip_all)]
    pub async fn callback(&self, code: &str, state: &str) -> UserResult<String> {
        let pending = self.states.verify_and_consume_state(state).await?;
        let tokens = self
            .provider
            .exchange_code(code, &pending.pkce_verifier, &pending.redirect_uri)
            .await?;
        let info = self.provider.get_user_info(&tokens.access_token).await?;
        let user = self.create_or_update_user(info).await?;
        self.issue_token(&user)
    }

    /// Frontend URL carrying either `token` or `error`.
    pub async fn callback_redirect(&self, params: OAuthCallbackParams) -> UserResult<String> {
        let outcome = match params {
            OAuthCallbackParams {
                error: Some(error), ..
            } => Err(UserError::OAuth(error)),
            OAuthCallbackParams {
                code: Some(code),
                state: Some(state),
                ..
            } => self.callback(&code, &state).await,
            _ => Err(UserError::OAuth("Missing code or state".to_string())),
        };

        let mut url = Url::parse(&self.google.frontend_url)
            .map_err(|e| UserError::Internal(format!("Invalid FRONTEND_URL: {}", e)))?;
        match outcome {
            Ok(token) => {
                url.query_pairs_mut().append_pair("token", &token);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Google callback failed");
                url.query_pairs_mut().append_pair("error", &e.to_string());
            }
        }
        Ok(url.to_string())
    }

    #[instrument(skip_all)]
    pub async fn mobile_login(&self, access_token: &str) -> UserResult<TokenLoginResponse> {
        if access_token.trim().is_empty() {
            return Err(UserError::Validation("access_token is required".to_string()));
        }
        let info = self.provider.get_user_info(access_token).await?;
        let user = self.create_or_update_user(info).await?;

        Ok(TokenLoginResponse {
            access_token: self.issue_token(&user)?,
            token_type: "bearer".to_string(),
            user: UserProfile::from(&user),
        })
    }

    /// Matches by Google id, then links an existing account by email, else
    /// creates a regular user.
    pub async fn create_or_update_user(&self, info: OAuthUserInfo) -> UserResult<User> {
        let email = info
            .email
            .ok_or_else(|| UserError::OAuth("Google account has no email".to_string()))?;
        let now = timestamp::now();

        let by_google_id = self.users.find_by_google_id(&info.provider_user_id).await?;
        let user = if let Some(mut user) = by_google_id {
            if let Some(name) = info.name {
                user.name = name;
            }
            user.picture = info.avatar_url;
            user.last_login = Some(now);
            user
        } else if let Some(mut user) = self.users.find_by_email(&email).await? {
            tracing::info!(user_id = %user.id, "Linking Google account to existing user");
            user.google_id = Some(info.provider_user_id);
            user.picture = info.avatar_url;
            user.last_login = Some(now);
            user
        } else {
            let name = info.name.unwrap_or_else(|| email.clone());
            let mut user = User::new(email, name, Role::User, AuthProvider::Google);
            user.google_id = Some(info.provider_user_id);
            user.picture = info.avatar_url;
            tracing::info!(user_id = %user.id, "Account created from Google");
            user
        };

        self.users.save(&user).await?;
        Ok(user)
    }

    pub fn issue_token(&self, user: &User) -> UserResult<String> {
        self.codec
            .issue(&user.email)
            .map_err(|e| UserError::Token(e.to_string()))
    }

    /// Bad or expired tokens resolve to nothing, as do disabled accounts.
    pub async fn user_for_token(&self, token: &str) -> UserResult<Option<User>> {
        let claims = match self.codec.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                return Ok(None);
            }
        };
        let user = self.users.find_by_email(&claims.sub).await?;
        Ok(user.filter(|u| u.is_active))
    }
}

#[async_trait]
impl<R: UserRepository> PrincipalResolver for JwtStrategy<R> {
    async fn resolve(&self, token: &str) -> Result<Option<AuthPrincipal>, AppError> {
        let user = self.user_for_token(token).await?;
        Ok(user.as_ref().map(User::principal))
    }
}

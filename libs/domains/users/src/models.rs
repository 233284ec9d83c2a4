use axum_helpers::{AuthPrincipal, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub use database::common::timestamp;

/// How the account first signed in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthProvider {
    #[default]
    Session,
    Google,
}

/// Stored account record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub google_id: Option<String>,
    #[serde(default)]
    pub provider: AuthProvider,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub session_expires: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub last_login: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        provider: AuthProvider,
    ) -> Self {
        let now = timestamp::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            name: name.into(),
            role,
            picture: None,
            google_id: None,
            provider,
            is_active: true,
            session_token: None,
            session_expires: None,
            created_at: now,
            last_login: Some(now),
        }
    }

    pub fn principal(&self) -> AuthPrincipal {
        AuthPrincipal {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }

    /// True when a session token is set and has not expired at `now`.
    pub fn session_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.session_token, self.session_expires) {
            (Some(_), Some(expires)) => expires > now,
            _ => false,
        }
    }
}

/// Account as returned by the API (no credentials)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub picture: Option<String>,
    pub provider: AuthProvider,
    pub is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            picture: user.picture.clone(),
            provider: user.provider,
            is_active: user.is_active,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile::from(&user)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

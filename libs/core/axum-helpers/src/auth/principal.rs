use crate::errors::AppError;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// The authenticated caller, whichever strategy produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthPrincipal {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl AuthPrincipal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Turns a presented credential into a principal.
///
/// Exactly one implementation is wired per deployment. `Ok(None)` means the
/// credential is unknown, expired or belongs to a disabled account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Option<AuthPrincipal>, AppError>;
}

/// Any authenticated caller; 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub AuthPrincipal);

/// An admin caller; 401 when anonymous, 403 when not an admin.
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub AuthPrincipal);

/// The caller if one was resolved. Never rejects.
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<AuthPrincipal>);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthPrincipal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
    }
}

impl<S> FromRequestParts<S> for AdminPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentPrincipal(principal) = CurrentPrincipal::from_request_parts(parts, state).await?;
        if !principal.is_admin() {
            tracing::info!(user_id = %principal.id, "Admin access denied");
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminPrincipal(principal))
    }
}

impl<S> FromRequestParts<S> for MaybePrincipal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybePrincipal(parts.extensions.get::<AuthPrincipal>().cloned()))
    }
}

use axum::Router;
use axum_helpers::PrincipalResolver;
use std::sync::Arc;

use crate::auth_handlers::{jwt_router, session_router};
use crate::config::{AuthConfig, AuthStrategyKind};
use crate::jwt::JwtStrategy;
use crate::repository::UserRepository;
use crate::session::SessionStrategy;

/// The one authentication strategy wired into a deployment.
pub enum AuthStrategy<R: UserRepository> {
    Session(Arc<SessionStrategy<R>>),
    Jwt(Arc<JwtStrategy<R>>),
}

impl<R: UserRepository> Clone for AuthStrategy<R> {
    fn clone(&self) -> Self {
        match self {
            AuthStrategy::Session(s) => AuthStrategy::Session(Arc::clone(s)),
            AuthStrategy::Jwt(j) => AuthStrategy::Jwt(Arc::clone(j)),
        }
    }
}

impl<R: UserRepository + 'static> AuthStrategy<R> {
    pub fn from_config(config: AuthConfig, users: Arc<R>) -> Self {
        match config {
            AuthConfig::Session(session) => {
                AuthStrategy::Session(Arc::new(SessionStrategy::from_config(users, session)))
            }
            AuthConfig::Jwt { jwt, google } => {
                AuthStrategy::Jwt(Arc::new(JwtStrategy::from_config(users, &jwt, google)))
            }
        }
    }

    pub fn kind(&self) -> AuthStrategyKind {
        match self {
            AuthStrategy::Session(_) => AuthStrategyKind::Session,
            AuthStrategy::Jwt(_) => AuthStrategyKind::Jwt,
        }
    }

    /// Resolver for `principal_middleware`
    pub fn resolver(&self) -> Arc<dyn PrincipalResolver> {
        match self {
            AuthStrategy::Session(s) => s.clone(),
            AuthStrategy::Jwt(j) => j.clone(),
        }
    }

    /// Login and logout routes of this strategy
    pub fn router(&self) -> Router {
        match self {
            AuthStrategy::Session(s) => session_router(Arc::clone(s)),
            AuthStrategy::Jwt(j) => jwt_router(Arc::clone(j)),
        }
    }
}

//! Users Domain
//!
//! Accounts, profiles and the two ways a storefront caller can authenticate.
//!
//! - **Session**: the client logs in with the hosted auth service and posts
//!   the session id to `/auth/session`; we issue an opaque 7-day token.
//! - **JWT**: Google OAuth (browser PKCE flow or mobile access token) ending
//!   in a short-lived HS256 bearer token.
//!
//! Exactly one strategy is active, picked by `AUTH_STRATEGY`. Both implement
//! [`axum_helpers::PrincipalResolver`], so the rest of the API only ever sees
//! an [`axum_helpers::AuthPrincipal`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────┐
//! │ Handlers / auth_handlers    │  ← HTTP endpoints
//! └──────┬───────────────┬──────┘
//!        │               │
//! ┌──────▼──────┐ ┌──────▼──────────────┐
//! │ UserService │ │ Session/JwtStrategy │  ← profiles; login + principal lookup
//! └──────┬──────┘ └──────┬──────────────┘
//!        │               │
//! ┌──────▼───────────────▼──────┐
//! │ UserRepository              │  ← MongoDB or in-memory
//! └─────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_users::{AuthConfig, AuthStrategy, MongoUserRepository, UserService, handlers};
//!
//! let users = Arc::new(MongoUserRepository::new(&db));
//! let strategy = AuthStrategy::from_config(AuthConfig::from_env()?, users.clone());
//!
//! let api = handlers::router(UserService::from_shared(users)).merge(strategy.router());
//! let resolver = strategy.resolver();
//! ```

pub mod auth_handlers;
pub mod config;
pub mod error;
pub mod handlers;
pub mod jwt;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod oauth;
pub mod repository;
pub mod service;
pub mod session;
pub mod strategy;

pub use config::{AuthConfig, AuthStrategyKind, GoogleConfig, SessionConfig};
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use jwt::{JwtStrategy, TokenLoginResponse};
pub use memory::InMemoryUserRepository;
pub use models::{AuthProvider, UpdateProfile, User, UserProfile};
pub use mongodb::MongoUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
pub use session::{SessionDataSource, SessionIdentity, SessionLoginResponse, SessionStrategy};
pub use strategy::AuthStrategy;

//! Pluggable caller authentication.
//!
//! A deployment wires one [`PrincipalResolver`] (session tokens or JWTs) into
//! [`principal_middleware`]; handlers then ask for [`CurrentPrincipal`],
//! [`AdminPrincipal`] or [`MaybePrincipal`].
//!
//! ```ignore
//! let resolver: Arc<dyn PrincipalResolver> = Arc::new(session_strategy);
//! let api = api.layer(axum::middleware::from_fn_with_state(resolver, principal_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod principal;

pub use config::JwtConfig;
pub use jwt::{JwtClaims, JwtCodec};
pub use middleware::{extract_token_from_request, principal_middleware};
pub use principal::{
    AdminPrincipal, AuthPrincipal, CurrentPrincipal, MaybePrincipal, PrincipalResolver, Role,
};

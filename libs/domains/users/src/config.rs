use axum_helpers::JwtConfig;
use chrono::Duration;
use core_config::{ConfigError, FromEnv, env_list, env_or_default, env_parse, env_required};
use strum::{Display, EnumString};

/// Which credential the deployment accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AuthStrategyKind {
    #[default]
    Session,
    Jwt,
}

/// External session service login.
///
/// - `SESSION_SERVICE_URL` (default: the hosted session-data endpoint)
/// - `SESSION_TTL_DAYS` (default 7)
/// - `ADMIN_EMAILS` (comma separated, default `admin@shop.com`)
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub service_url: String,
    pub ttl: Duration,
    pub admin_emails: Vec<String>,
}

pub const DEFAULT_SESSION_SERVICE_URL: &str =
    "https://demobackend.emergentagent.com/auth/v1/env/oauth/session-data";

impl SessionConfig {
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SESSION_SERVICE_URL.to_string(),
            ttl: Duration::days(7),
            admin_emails: vec!["admin@shop.com".to_string()],
        }
    }
}

impl FromEnv for SessionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            service_url: env_or_default("SESSION_SERVICE_URL", DEFAULT_SESSION_SERVICE_URL),
            ttl: Duration::days(env_parse("SESSION_TTL_DAYS", 7i64)?),
            admin_emails: env_list("ADMIN_EMAILS", "admin@shop.com"),
        })
    }
}

/// Google OAuth client.
///
/// - `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET` (required)
/// - `GOOGLE_REDIRECT_URI` (default `http://localhost:8001/api/auth/google/callback`)
/// - `FRONTEND_URL` (default `http://localhost:3000`)
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub frontend_url: String,
}

impl FromEnv for GoogleConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: env_required("GOOGLE_CLIENT_ID")?,
            client_secret: env_required("GOOGLE_CLIENT_SECRET")?,
            redirect_uri: env_or_default(
                "GOOGLE_REDIRECT_URI",
                "http://localhost:8001/api/auth/google/callback",
            ),
            frontend_url: env_or_default("FRONTEND_URL", "http://localhost:3000"),
        })
    }
}

/// Settings for the configured strategy. Google and JWT settings are only
/// read when `AUTH_STRATEGY=jwt`.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    Session(SessionConfig),
    Jwt { jwt: JwtConfig, google: GoogleConfig },
}

impl AuthConfig {
    pub fn kind(&self) -> AuthStrategyKind {
        match self {
            AuthConfig::Session(_) => AuthStrategyKind::Session,
            AuthConfig::Jwt { .. } => AuthStrategyKind::Jwt,
        }
    }
}

impl FromEnv for AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let kind = env_parse("AUTH_STRATEGY", AuthStrategyKind::default())?;
        match kind {
            AuthStrategyKind::Session => Ok(AuthConfig::Session(SessionConfig::from_env()?)),
            AuthStrategyKind::Jwt => Ok(AuthConfig::Jwt {
                jwt: JwtConfig::from_env()?,
                google: GoogleConfig::from_env()?,
            }),
        }
    }
}

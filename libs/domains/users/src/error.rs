use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid session")]
    InvalidSession,

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Authentication service unavailable: {0}")]
    Upstream(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Unauthorized(msg) => AppError::Unauthorized(msg),
            UserError::InvalidSession => AppError::Unauthorized("Invalid session".to_string()),
            UserError::OAuth(msg) => {
                tracing::warn!(error = %msg, "OAuth flow failed");
                AppError::Unauthorized(format!("OAuth authentication failed: {}", msg))
            }
            UserError::Upstream(msg) => AppError::BadGateway(msg),
            UserError::Token(msg) => AppError::InternalServerError(msg),
            UserError::Database(msg) => AppError::Database(msg),
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}

impl From<database::DatabaseError> for UserError {
    fn from(err: database::DatabaseError) -> Self {
        UserError::Database(err.to_string())
    }
}

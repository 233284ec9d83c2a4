use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisitorError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Visit channel closed")]
    ChannelClosed,
}

pub type VisitorResult<T> = Result<T, VisitorError>;

impl From<VisitorError> for AppError {
    fn from(err: VisitorError) -> Self {
        match err {
            VisitorError::Database(msg) => AppError::Database(msg),
            VisitorError::ChannelClosed => {
                AppError::ServiceUnavailable("Visitor tracking is shutting down".to_string())
            }
        }
    }
}

impl From<mongodb::error::Error> for VisitorError {
    fn from(err: mongodb::error::Error) -> Self {
        VisitorError::Database(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for VisitorError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        VisitorError::Database(err.to_string())
    }
}

impl From<database::DatabaseError> for VisitorError {
    fn from(err: database::DatabaseError) -> Self {
        VisitorError::Database(err.to_string())
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid value '{value}' for filter parameter '{name}'")]
    InvalidFilterParameter { name: &'static str, value: String },

    #[error("Image of {size_bytes} bytes exceeds the {max_bytes} byte limit")]
    ImageTooLarge { size_bytes: usize, max_bytes: usize },

    #[error("Image could not be decoded: {0}")]
    ImageDecodeFailed(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::InvalidFilterParameter { name, value } => AppError::Coded {
                status: StatusCode::BAD_REQUEST,
                code: ErrorCode::InvalidFilterParameter,
                message: format!("Invalid value for '{}'", name),
                details: Some(json!({ "parameter": name, "value": value })),
            },
            ProductError::ImageTooLarge {
                size_bytes,
                max_bytes,
            } => AppError::Coded {
                status: StatusCode::BAD_REQUEST,
                code: ErrorCode::ImageTooLarge,
                message: format!(
                    "Image too large. Maximum size is {}MB",
                    max_bytes / (1024 * 1024)
                ),
                details: Some(json!({ "size_bytes": size_bytes, "max_bytes": max_bytes })),
            },
            ProductError::ImageDecodeFailed(reason) => AppError::Coded {
                status: StatusCode::BAD_REQUEST,
                code: ErrorCode::ImageDecodeFailed,
                message: "Image could not be decoded".to_string(),
                details: Some(json!({ "reason": reason })),
            },
            ProductError::Database(msg) => AppError::Database(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for ProductError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        ProductError::Internal(err.to_string())
    }
}

impl From<database::DatabaseError> for ProductError {
    fn from(err: database::DatabaseError) -> Self {
        ProductError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_too_large_maps_to_coded_bad_request() {
        let err: AppError = ProductError::ImageTooLarge {
            size_bytes: 11 * 1024 * 1024,
            max_bytes: 10 * 1024 * 1024,
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), ErrorCode::ImageTooLarge);
        assert!(err.to_string().contains("10MB"));
    }

    #[test]
    fn test_filter_error_keeps_parameter_name() {
        let err: AppError = ProductError::InvalidFilterParameter {
            name: "min_price",
            value: "cheap".into(),
        }
        .into();
        assert_eq!(err.error_code(), ErrorCode::InvalidFilterParameter);
        match err {
            AppError::Coded { details, .. } => {
                assert_eq!(details.unwrap()["parameter"], "min_price");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_not_found_and_database_mapping() {
        let err: AppError = ProductError::NotFound("abc".into()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: AppError = ProductError::Database("boom".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), ErrorCode::DatabaseError);
    }
}

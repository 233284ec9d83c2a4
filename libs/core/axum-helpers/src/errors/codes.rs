//! Error codes carried by every API error body.
//!
//! A code has a client-facing identifier (`"IMAGE_TOO_LARGE"`), an integer
//! for logs and dashboards (`1101`), a default message and the HTTP status
//! it is normally sent with.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ImageTooLarge;
//! assert_eq!(code.as_str(), "IMAGE_TOO_LARGE");
//! assert_eq!(code.code(), 1101);
//! ```

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    ValidationError,
    InvalidUuid,
    JsonExtraction,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    UnprocessableEntity,

    ImageTooLarge,
    ImageDecodeFailed,
    InvalidFilterParameter,

    InternalError,
    ServiceUnavailable,
    UpstreamError,
    DatabaseError,
    IoError,
    SerdeJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// 10xx request problems, 11xx catalog input, 20xx storage and
    /// dependencies, 40xx/50xx local failures.
    pub fn code(&self) -> i32 {
        use ErrorCode::*;
        match self {
            BadRequest => 1000,
            ValidationError => 1001,
            InvalidUuid => 1002,
            JsonExtraction => 1003,
            NotFound => 1004,
            InternalError => 1005,
            Unauthorized => 1006,
            Forbidden => 1007,
            Conflict => 1008,
            UnprocessableEntity => 1009,
            ServiceUnavailable => 1011,
            UpstreamError => 1012,
            ImageTooLarge => 1101,
            ImageDecodeFailed => 1102,
            InvalidFilterParameter => 1103,
            DatabaseError => 2003,
            IoError => 4001,
            SerdeJsonError => 5001,
        }
    }

    pub fn status(&self) -> StatusCode {
        use ErrorCode::*;
        match self {
            BadRequest | ValidationError | InvalidUuid | JsonExtraction | ImageTooLarge
            | ImageDecodeFailed | InvalidFilterParameter => StatusCode::BAD_REQUEST,
            NotFound => StatusCode::NOT_FOUND,
            Unauthorized => StatusCode::UNAUTHORIZED,
            Forbidden => StatusCode::FORBIDDEN,
            Conflict => StatusCode::CONFLICT,
            UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            UpstreamError => StatusCode::BAD_GATEWAY,
            InternalError | DatabaseError | IoError | SerdeJsonError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn default_message(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            BadRequest => "Bad request",
            ValidationError => "Request validation failed",
            InvalidUuid => "Invalid UUID format",
            JsonExtraction => "Failed to parse request body",
            NotFound => "Resource not found",
            Unauthorized => "Authentication required",
            Forbidden => "Access forbidden",
            Conflict => "Resource already exists",
            UnprocessableEntity => "Request cannot be processed",
            ImageTooLarge => "Image exceeds the upload size limit",
            ImageDecodeFailed => "Image could not be decoded",
            InvalidFilterParameter => "Invalid product filter",
            InternalError => "An internal server error occurred",
            ServiceUnavailable => "Service is temporarily unavailable",
            UpstreamError => "Upstream service request failed",
            DatabaseError => "Database error occurred",
            IoError => "I/O error occurred",
            SerdeJsonError => "JSON serialization error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_matches_serde_and_display() {
        for code in [
            ErrorCode::BadRequest,
            ErrorCode::ImageTooLarge,
            ErrorCode::InvalidFilterParameter,
            ErrorCode::UpstreamError,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            assert_eq!(code.to_string(), code.as_str());
            assert_eq!(serde_json::from_str::<ErrorCode>(&json).unwrap(), code);
        }
        assert_eq!(
            ErrorCode::InvalidFilterParameter.as_str(),
            "INVALID_FILTER_PARAMETER"
        );
    }

    #[test]
    fn test_integer_codes() {
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(ErrorCode::ImageDecodeFailed.code(), 1102);
        assert_eq!(ErrorCode::DatabaseError.code(), 2003);
    }

    #[test]
    fn test_catalog_input_codes_are_client_errors() {
        for code in [
            ErrorCode::ImageTooLarge,
            ErrorCode::ImageDecodeFailed,
            ErrorCode::InvalidFilterParameter,
        ] {
            assert_eq!(code.status(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(ErrorCode::UpstreamError.status(), StatusCode::BAD_GATEWAY);
    }
}

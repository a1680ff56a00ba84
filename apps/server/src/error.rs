//! Error handling for the HTTP API

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use srs_core::CoreError;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            err if err.is_validation() => ApiError::BadRequest(message),
            CoreError::NotFound(_) => ApiError::NotFound(message),
            CoreError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ApiError::NotFound(message)
            }
            _ => ApiError::Internal(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_not_found_status() {
        let error = ApiError::NotFound("deck spanish".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bad_request_status() {
        let error = ApiError::BadRequest("invalid input".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_status() {
        let error = ApiError::Internal("unexpected error".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_rating_is_bad_request() {
        let error = ApiError::from(CoreError::InvalidRating(5));
        assert!(matches!(error, ApiError::BadRequest(_)));
        assert_eq!(error.to_string(), "Bad request: invalid rating 5: must be 1-4");
    }

    #[test]
    fn test_missing_argument_is_bad_request() {
        let error = ApiError::from(CoreError::MissingArgument("file_path"));
        assert_eq!(error.to_string(), "Bad request: file_path is required");
    }

    #[test]
    fn test_path_outside_deck_is_bad_request() {
        let error = ApiError::from(CoreError::OutsideDeck(PathBuf::from("../bashrc")));
        assert_eq!(error.to_string(), "Bad request: ../bashrc is outside the base deck");

        let error = ApiError::from(CoreError::NotACard(PathBuf::from("/decks/notes.txt")));
        assert!(matches!(error, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_missing_deck_is_not_found() {
        let error = ApiError::from(CoreError::NotFound(PathBuf::from("/decks/french")));
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[test]
    fn test_missing_card_file_is_not_found() {
        let error = ApiError::from(CoreError::Read {
            path: PathBuf::from("/decks/gone.md"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[test]
    fn test_unwritable_card_is_internal() {
        let error = ApiError::from(CoreError::Write {
            path: PathBuf::from("/decks/a.md"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert!(matches!(error, ApiError::Internal(_)));
    }

    #[test]
    fn test_no_base_deck_is_internal() {
        let error = ApiError::from(CoreError::NoBaseDeck);
        assert_eq!(
            error.to_string(),
            "Internal error: no base deck configured - run 'srs config' to set up"
        );
    }
}

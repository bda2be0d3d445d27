use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The prediction store could not be reached or is corrupt.
    #[error("Storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),

    /// The model artifact is missing, malformed or produced an unknown label.
    #[error("Inference unavailable: {0}")]
    Inference(String),

    /// Invalid credentials or no live session.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The session's role may not perform the operation.
    #[error("Authorization failed")]
    Unauthorized,

    /// Malformed feature input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Prediction store unavailable".to_string(),
                )
            }

            AppError::Inference(ref msg) => {
                tracing::error!("Inference error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Risk model unavailable".to_string(),
                )
            }

            AppError::Authentication(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                (StatusCode::UNAUTHORIZED, msg.clone())
            }

            AppError::Unauthorized => {
                tracing::warn!("Authorization failed");
                (StatusCode::FORBIDDEN, "Forbidden".to_string())
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, [(http::header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failures_map_to_service_unavailable() {
        let response = AppError::Storage(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn auth_and_role_failures_are_distinct() {
        let auth = AppError::Authentication("Invalid username or password".into()).into_response();
        let role = AppError::Unauthorized.into_response();
        assert_eq!(auth.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(role.status(), StatusCode::FORBIDDEN);
    }
}

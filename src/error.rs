// src/error.rs
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("malformed request body")]
    MalformedBody,
    #[error("authentication required")]
    Unauthorized,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    ValidationError(String),
}

impl AppError {
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MalformedBody | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Server-side failures keep their detail in the log only.
        let error_message = match &self {
            AppError::DatabaseError(e) => {
                tracing::error!(error = %e, "Database error");
                "Database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "Internal server error".to_string()
            }
            AppError::MalformedBody => "Malformed request body".to_string(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::ValidationError(msg) => msg.clone(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case(AppError::Unauthorized, StatusCode::UNAUTHORIZED)]
    #[case(AppError::forbidden("Admin access required"), StatusCode::FORBIDDEN)]
    #[case(AppError::MalformedBody, StatusCode::BAD_REQUEST)]
    #[case(AppError::validation("End date must be after start date"), StatusCode::BAD_REQUEST)]
    #[case(AppError::conflict("Like already exists"), StatusCode::CONFLICT)]
    #[case(AppError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_mapping(#[case] err: AppError, #[case] expected: StatusCode) {
        assert_eq!(err.status(), expected);
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_exposed() {
        let (status, body) = body_json(AppError::internal("connection refused at 10.0.0.3")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_forbidden_message_passes_through() {
        let (_, body) = body_json(AppError::forbidden("Admin access required")).await;
        assert_eq!(body["error"], "Admin access required");
    }
}

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// Free-tier caller already created the monthly maximum of proposals.
    #[error("Free plan proposal limit reached")]
    FreeLimitReached,

    #[error("Proposal has already been signed")]
    AlreadySigned,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Auth service error: {0}")]
    AuthService(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Llm(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingCredentials | AuthError::InvalidToken => AppError::Unauthorized,
            AuthError::Http(e) => AppError::AuthService(e.to_string()),
            AuthError::Upstream { status, message } => {
                AppError::AuthService(format!("status {status}: {message}"))
            }
        }
    }
}

impl AppError {
    /// Machine-readable short code carried in every error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::Unauthorized => "unauthorized",
            AppError::FreeLimitReached => "free_limit_reached",
            AppError::AlreadySigned => "already_signed",
            AppError::Database(_) => "database_error",
            AppError::Llm(_) => "llm_error",
            AppError::AuthService(_) => "auth_service_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            AppError::FreeLimitReached => (
                StatusCode::FORBIDDEN,
                "Free plan limit reached. Upgrade to create more proposals this month.".to_string(),
            ),
            AppError::AlreadySigned => (
                StatusCode::BAD_REQUEST,
                "This proposal has already been signed".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::AuthService(msg) => {
                tracing::error!("Auth service error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An authentication service error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

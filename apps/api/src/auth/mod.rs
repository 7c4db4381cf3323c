//! Identity collaborator: turns a bearer credential into a stable user identity.
//!
//! Verification itself is delegated to the hosted auth service (`SupabaseIdentity`).
//! Handlers take an `AuthUser` extractor; routes without it are public.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub mod supabase;

pub use supabase::SupabaseIdentity;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer credentials")]
    MissingCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Auth service error (status {status}): {message}")]
    Upstream { status: u16, message: String },
}

/// The caller as reported by the identity service.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: Option<String>,
    /// Display name from the identity's own metadata; the profile row takes precedence.
    pub full_name: Option<String>,
}

/// Verifies a bearer token against the identity service.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, bearer_token: &str) -> Result<Identity, AuthError>;
}

/// Extractor for routes that require a signed-in freelancer.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AuthError::MissingCredentials)?;

        let identity = state.identity.verify(token).await?;
        Ok(AuthUser(identity))
    }
}

/// Returns the token part of a `Bearer <token>` header value.
fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{AuthError, Identity, IdentityVerifier};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Verifies access tokens with the hosted Supabase auth service (`GET /auth/v1/user`).
#[derive(Clone)]
pub struct SupabaseIdentity {
    client: Client,
    base_url: String,
    anon_key: SecretString,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    full_name: Option<String>,
}

impl From<SupabaseUser> for Identity {
    fn from(user: SupabaseUser) -> Self {
        Identity {
            user_id: user.id,
            email: user.email.filter(|e| !e.is_empty()),
            full_name: user
                .user_metadata
                .full_name
                .filter(|n| !n.trim().is_empty()),
        }
    }
}

impl SupabaseIdentity {
    pub fn new(base_url: String, anon_key: SecretString) -> Result<Self, AuthError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url,
            anon_key,
        })
    }
}

#[async_trait]
impl IdentityVerifier for SupabaseIdentity {
    async fn verify(&self, bearer_token: &str) -> Result<Identity, AuthError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(bearer_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!("Auth service rejected token ({status})");
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Auth service returned {status}: {message}");
            return Err(AuthError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let user: SupabaseUser = response.json().await?;
        Ok(user.into())
    }
}

use anyhow::{Context, Result};
use secrecy::SecretString;

const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_PUBLIC_APP_URL: &str = "http://localhost:3000";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: SecretString,
    pub supabase_url: String,
    pub supabase_anon_key: SecretString,
    pub anthropic_api_key: SecretString,
    pub anthropic_api_url: String,
    /// Base URL of the web app; public signing links are `{public_app_url}/proposal/{token}`.
    pub public_app_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: SecretString::new(require_env("DATABASE_URL")?),
            supabase_url: require_env("SUPABASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            supabase_anon_key: SecretString::new(require_env("SUPABASE_ANON_KEY")?),
            anthropic_api_key: SecretString::new(require_env("ANTHROPIC_API_KEY")?),
            anthropic_api_url: std::env::var("ANTHROPIC_API_URL")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_API_URL.to_string()),
            public_app_url: std::env::var("PUBLIC_APP_URL")
                .unwrap_or_else(|_| DEFAULT_PUBLIC_APP_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Public URL a client opens to read and sign a proposal.
    pub fn signing_url(&self, signing_token: &str) -> String {
        format!("{}/proposal/{}", self.public_app_url, signing_token)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: SecretString::new("postgres://localhost/scopelock_test".to_string()),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: SecretString::new("anon".to_string()),
            anthropic_api_key: SecretString::new("test-key".to_string()),
            anthropic_api_url: DEFAULT_ANTHROPIC_API_URL.to_string(),
            public_app_url: "https://app.example.test".to_string(),
            port: 8080,
            rust_log: "debug".to_string(),
        }
    }
}

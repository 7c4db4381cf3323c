mod auth;
mod config;
mod db;
mod errors;
mod extract;
mod llm_client;
mod models;
mod proposals;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::SupabaseIdentity;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::proposals::store::PgProposalStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ScopeLock API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgProposalStore::new(db));

    // Initialize identity verifier
    let identity = Arc::new(SupabaseIdentity::new(
        config.supabase_url.clone(),
        config.supabase_anon_key.clone(),
    )?);
    info!("Identity verifier initialized ({})", config.supabase_url);

    // Initialize LLM client
    let generator = Arc::new(LlmClient::new(
        config.anthropic_api_key.clone(),
        config.anthropic_api_url.clone(),
    )?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        store,
        identity,
        generator,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to PUBLIC_APP_URL

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use std::sync::Arc;

use crate::auth::IdentityVerifier;
use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::proposals::store::ProposalStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Each external collaborator sits behind a trait so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProposalStore>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub generator: Arc<dyn TextGenerator>,
    pub config: Config,
}

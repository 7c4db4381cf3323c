//! In-memory collaborators for unit and handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::{AuthError, Identity, IdentityVerifier};
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::{GenerationParams, LlmError, TextGenerator};
use crate::models::proposal::{NewProposal, ProposalRow};
use crate::models::user::ProfileRow;
use crate::proposals::lifecycle::{new_signing_token, ProposalStatus};
use crate::proposals::store::ProposalStore;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// MemoryStore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<ProposalRow>>,
    profiles: Mutex<HashMap<Uuid, ProfileRow>>,
}

impl MemoryStore {
    pub fn add_profile(&self, profile: ProfileRow) {
        self.profiles.lock().unwrap().insert(profile.id, profile);
    }

    /// Adds a bare proposal owned by `user_id` created at `created_at`.
    pub fn seed_created_at(&self, user_id: Uuid, created_at: DateTime<Utc>) -> ProposalRow {
        let row = ProposalRow {
            id: Uuid::new_v4(),
            user_id,
            title: "Seeded".to_string(),
            client_name: "Seed Client".to_string(),
            client_email: None,
            project_type: "Web Design".to_string(),
            deliverables: "Seed deliverables".to_string(),
            timeline: String::new(),
            price: 0.0,
            revision_limit: 2,
            revisions_used: 0,
            payment_terms: String::new(),
            proposal_content: "seed".to_string(),
            status: ProposalStatus::Draft,
            signing_token: new_signing_token(),
            signed_at: None,
            client_signature: None,
            created_at,
        };
        self.rows.lock().unwrap().push(row.clone());
        row
    }

    pub fn rows(&self) -> Vec<ProposalRow> {
        self.rows.lock().unwrap().clone()
    }

    fn update<F>(&self, matches: impl Fn(&ProposalRow) -> bool, apply: F) -> Option<ProposalRow>
    where
        F: FnOnce(&mut ProposalRow) -> bool,
    {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|r| matches(r))?;
        apply(row).then(|| row.clone())
    }
}

#[async_trait]
impl ProposalStore for MemoryStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, AppError> {
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn count_created_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id && r.created_at >= since)
            .count() as i64)
    }

    async fn insert(&self, proposal: NewProposal) -> Result<ProposalRow, AppError> {
        let row = ProposalRow {
            id: Uuid::new_v4(),
            user_id: proposal.user_id,
            title: proposal.title,
            client_name: proposal.client_name,
            client_email: proposal.client_email,
            project_type: proposal.project_type,
            deliverables: proposal.deliverables,
            timeline: proposal.timeline,
            price: proposal.price,
            revision_limit: proposal.revision_limit,
            revisions_used: 0,
            payment_terms: proposal.payment_terms,
            proposal_content: proposal.proposal_content,
            status: ProposalStatus::Draft,
            signing_token: proposal.signing_token,
            signed_at: None,
            client_signature: None,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<ProposalRow>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned())
    }

    async fn list_owned(&self, user_id: Uuid) -> Result<Vec<ProposalRow>, AppError> {
        let mut owned: Vec<ProposalRow> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ProposalRow>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.signing_token == token)
            .cloned())
    }

    async fn mark_sent(&self, user_id: Uuid, id: Uuid) -> Result<Option<ProposalRow>, AppError> {
        Ok(self.update(
            |r| r.id == id && r.user_id == user_id,
            |row| match row.status.mark_sent() {
                Ok(status) => {
                    row.status = status;
                    true
                }
                Err(_) => false,
            },
        ))
    }

    async fn sign(
        &self,
        token: &str,
        signer_name: &str,
        signed_at: DateTime<Utc>,
    ) -> Result<Option<ProposalRow>, AppError> {
        Ok(self.update(
            |r| r.signing_token == token,
            |row| match row.status.sign() {
                Ok(status) => {
                    row.status = status;
                    row.signed_at = Some(signed_at);
                    row.client_signature = Some(signer_name.to_string());
                    true
                }
                Err(_) => false,
            },
        ))
    }

    async fn increment_revisions(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ProposalRow>, AppError> {
        Ok(self.update(
            |r| r.id == id && r.user_id == user_id,
            |row| {
                row.revisions_used += 1;
                true
            },
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FakeGenerator
// ────────────────────────────────────────────────────────────────────────────

enum Reply {
    Text(String),
    Empty,
    Fail,
}

/// Records every prompt it receives and answers with a fixed reply.
pub struct FakeGenerator {
    reply: Reply,
    calls: Mutex<Vec<(String, GenerationParams)>>,
}

impl FakeGenerator {
    fn with(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with(Reply::Text(text.to_string()))
    }

    pub fn empty() -> Self {
        Self::with(Reply::Empty)
    }

    pub fn failing() -> Self {
        Self::with(Reply::Fail)
    }

    pub fn calls(&self) -> Vec<(String, GenerationParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<Option<String>, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), params));
        match &self.reply {
            Reply::Text(text) => Ok(Some(text.clone())),
            Reply::Empty => Ok(None),
            Reply::Fail => Err(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            }),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// StaticIdentity
// ────────────────────────────────────────────────────────────────────────────

/// Accepts only the tokens it was given.
#[derive(Default)]
pub struct StaticIdentity {
    users: HashMap<String, Identity>,
}

impl StaticIdentity {
    pub fn with_user(mut self, token: &str, identity: Identity) -> Self {
        self.users.insert(token.to_string(), identity);
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentity {
    async fn verify(&self, bearer_token: &str) -> Result<Identity, AuthError> {
        self.users
            .get(bearer_token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AppState wiring
// ────────────────────────────────────────────────────────────────────────────

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub generator: Arc<FakeGenerator>,
}

impl TestApp {
    pub fn new(identity: StaticIdentity, generator: FakeGenerator) -> Self {
        let store = Arc::new(MemoryStore::default());
        let generator = Arc::new(generator);
        let state = AppState {
            store: store.clone(),
            identity: Arc::new(identity),
            generator: generator.clone(),
            config: Config::for_tests(),
        };
        Self {
            state,
            store,
            generator,
        }
    }
}

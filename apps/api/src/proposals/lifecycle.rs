//! Proposal Lifecycle Controller: owns the `status` field and the revision counter.
//!
//! ```text
//! create ──▶ draft ──mark_sent──▶ sent
//!              │                    │
//!              └──────sign─────────┴──▶ signed (terminal)
//! ```
//!
//! Two trust tiers:
//! - owner: bearer-authenticated freelancer; reads, `mark_sent`, `log_revision`
//! - token holder: anyone with the signing token; public read and a single `sign`
//!
//! Every transition is one conditional row update. A transition that loses a race
//! (or targets a signed record) changes nothing and reports `AlreadySigned`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::proposal::{NewProposal, ProposalRow, PublicProposal};
use crate::proposals::composer::ProposalInput;
use crate::proposals::store::ProposalStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum ProposalStatus {
    Draft,
    Sent,
    Signed,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Sent => "sent",
            ProposalStatus::Signed => "signed",
        }
    }

    /// `draft | sent → sent`. Re-sending is a no-op.
    pub fn mark_sent(self) -> Result<Self, AppError> {
        match self {
            ProposalStatus::Draft | ProposalStatus::Sent => Ok(ProposalStatus::Sent),
            ProposalStatus::Signed => Err(AppError::AlreadySigned),
        }
    }

    /// `draft | sent → signed`, at most once.
    pub fn sign(self) -> Result<Self, AppError> {
        match self {
            ProposalStatus::Draft | ProposalStatus::Sent => Ok(ProposalStatus::Signed),
            ProposalStatus::Signed => Err(AppError::AlreadySigned),
        }
    }
}

/// Revision counter as shown on the owner's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevisionSummary {
    pub revisions_used: i32,
    pub revision_limit: i32,
    /// Display indicator only; logging continues past the limit.
    pub limit_reached: bool,
}

impl From<&ProposalRow> for RevisionSummary {
    fn from(row: &ProposalRow) -> Self {
        RevisionSummary {
            revisions_used: row.revisions_used,
            revision_limit: row.revision_limit,
            limit_reached: row.revisions_used >= row.revision_limit,
        }
    }
}

/// Fresh unguessable capability for the public signing link (122 random bits, 32 hex chars).
pub fn new_signing_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn proposal_not_found() -> AppError {
    AppError::NotFound("Proposal not found".to_string())
}

/// Persists a freshly composed proposal as a `draft`.
pub async fn create(
    store: &dyn ProposalStore,
    owner: Uuid,
    input: ProposalInput,
    proposal_content: String,
) -> Result<ProposalRow, AppError> {
    let row = store
        .insert(NewProposal {
            user_id: owner,
            title: input.title,
            client_name: input.client_name,
            client_email: input.client_email,
            project_type: input.project_type,
            deliverables: input.deliverables,
            timeline: input.timeline,
            price: input.price,
            revision_limit: input.revision_limit,
            payment_terms: input.payment_terms,
            proposal_content,
            signing_token: new_signing_token(),
        })
        .await?;
    info!("Created proposal {} for user {}", row.id, owner);
    Ok(row)
}

/// Owner read. Records owned by someone else are reported as not found.
pub async fn get_owned(
    store: &dyn ProposalStore,
    owner: Uuid,
    id: Uuid,
) -> Result<ProposalRow, AppError> {
    store
        .find_owned(owner, id)
        .await?
        .ok_or_else(proposal_not_found)
}

pub async fn list_owned(store: &dyn ProposalStore, owner: Uuid) -> Result<Vec<ProposalRow>, AppError> {
    store.list_owned(owner).await
}

/// Token-holder read, reduced field set.
pub async fn get_public(store: &dyn ProposalStore, token: &str) -> Result<PublicProposal, AppError> {
    store
        .find_by_token(token)
        .await?
        .map(PublicProposal::from)
        .ok_or_else(proposal_not_found)
}

pub async fn mark_sent(
    store: &dyn ProposalStore,
    owner: Uuid,
    id: Uuid,
) -> Result<ProposalRow, AppError> {
    if let Some(row) = store.mark_sent(owner, id).await? {
        info!("Proposal {} marked {}", row.id, row.status.as_str());
        return Ok(row);
    }
    match store.find_owned(owner, id).await? {
        None => Err(proposal_not_found()),
        Some(row) => row.status.mark_sent().map(|_| row),
    }
}

/// Signs the proposal behind `token` with the typed name.
///
/// The update only applies while the record is unsigned, so of two concurrent
/// signers exactly one succeeds and the other gets `AlreadySigned`.
pub async fn sign(
    store: &dyn ProposalStore,
    token: &str,
    signer_name: &str,
    now: DateTime<Utc>,
) -> Result<ProposalRow, AppError> {
    let signer_name = signer_name.trim();
    if signer_name.is_empty() {
        return Err(AppError::Validation("Signature is required".to_string()));
    }

    if let Some(row) = store.sign(token, signer_name, now).await? {
        info!("Proposal {} signed by client", row.id);
        return Ok(row);
    }
    match store.find_by_token(token).await? {
        None => Err(proposal_not_found()),
        // Present but not updated: someone signed first.
        Some(_) => Err(AppError::AlreadySigned),
    }
}

/// Adds one to `revisions_used`. Never clamped against `revision_limit`.
pub async fn log_revision(
    store: &dyn ProposalStore,
    owner: Uuid,
    id: Uuid,
) -> Result<RevisionSummary, AppError> {
    let row = store
        .increment_revisions(owner, id)
        .await?
        .ok_or_else(proposal_not_found)?;
    let summary = RevisionSummary::from(&row);
    info!(
        "Proposal {} revisions {}/{}",
        row.id, summary.revisions_used, summary.revision_limit
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposals::category::ProjectCategory;
    use crate::testing::MemoryStore;

    fn input() -> ProposalInput {
        ProposalInput {
            client_name: "Northwind Bakery".to_string(),
            client_email: Some("owner@northwind.test".to_string()),
            title: "Storefront redesign".to_string(),
            project_type: "Web Design".to_string(),
            category: ProjectCategory::WebDesign,
            deliverables: "5 pages".to_string(),
            timeline: "4 weeks".to_string(),
            price_text: "$2,000".to_string(),
            price: 2000.0,
            revision_limit: 2,
            payment_terms: "Net 15".to_string(),
        }
    }

    async fn created(store: &MemoryStore, owner: Uuid) -> ProposalRow {
        create(store, owner, input(), "PROJECT PROPOSAL".to_string())
            .await
            .unwrap()
    }

    #[test]
    fn test_status_transitions() {
        assert_eq!(ProposalStatus::Draft.mark_sent().unwrap(), ProposalStatus::Sent);
        assert_eq!(ProposalStatus::Sent.mark_sent().unwrap(), ProposalStatus::Sent);
        assert_eq!(ProposalStatus::Draft.sign().unwrap(), ProposalStatus::Signed);
        assert_eq!(ProposalStatus::Sent.sign().unwrap(), ProposalStatus::Signed);
        assert!(matches!(
            ProposalStatus::Signed.sign(),
            Err(AppError::AlreadySigned)
        ));
        assert!(matches!(
            ProposalStatus::Signed.mark_sent(),
            Err(AppError::AlreadySigned)
        ));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ProposalStatus::Signed).unwrap(),
            serde_json::json!("signed")
        );
        assert_eq!(ProposalStatus::Sent.as_str(), "sent");
    }

    #[test]
    fn test_signing_tokens_are_unique_hex() {
        let a = new_signing_token();
        let b = new_signing_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_create_starts_as_unsigned_draft() {
        let store = MemoryStore::default();
        let row = created(&store, Uuid::new_v4()).await;
        assert_eq!(row.status, ProposalStatus::Draft);
        assert_eq!(row.revisions_used, 0);
        assert_eq!(row.signed_at, None);
        assert_eq!(row.client_signature, None);
        assert_eq!(row.price, 2000.0);
    }

    #[tokio::test]
    async fn test_sign_once_then_already_signed() {
        let store = MemoryStore::default();
        let row = created(&store, Uuid::new_v4()).await;
        let now = Utc::now();

        let signed = sign(&store, &row.signing_token, "  Dana Ruiz ", now)
            .await
            .unwrap();
        assert_eq!(signed.status, ProposalStatus::Signed);
        assert_eq!(signed.client_signature.as_deref(), Some("Dana Ruiz"));
        assert_eq!(signed.signed_at, Some(now));

        let again = sign(&store, &row.signing_token, "Someone Else", Utc::now()).await;
        assert!(matches!(again, Err(AppError::AlreadySigned)));

        let stored = store.find_by_token(&row.signing_token).await.unwrap().unwrap();
        assert_eq!(stored.client_signature.as_deref(), Some("Dana Ruiz"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_signers_exactly_one_wins() {
        let store = std::sync::Arc::new(MemoryStore::default());
        let token = created(&store, Uuid::new_v4()).await.signing_token;

        let signers: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                let token = token.clone();
                tokio::spawn(async move {
                    sign(store.as_ref(), &token, &format!("Signer {i}"), Utc::now()).await
                })
            })
            .collect();

        let mut winners = Vec::new();
        for signer in signers {
            match signer.await.unwrap() {
                Ok(row) => winners.push(row),
                Err(AppError::AlreadySigned) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(winners.len(), 1);

        let stored = store.find_by_token(&token).await.unwrap().unwrap();
        assert_eq!(stored.client_signature, winners[0].client_signature);
        assert_eq!(stored.signed_at, winners[0].signed_at);
    }

    #[tokio::test]
    async fn test_sign_rejects_blank_name_before_lookup() {
        let store = MemoryStore::default();
        let result = sign(&store, "no-such-token", "   ", Utc::now()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sign_unknown_token_is_not_found() {
        let store = MemoryStore::default();
        let result = sign(&store, "no-such-token", "Dana", Utc::now()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_sent_proposal_can_be_signed() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let row = created(&store, owner).await;

        let sent = mark_sent(&store, owner, row.id).await.unwrap();
        assert_eq!(sent.status, ProposalStatus::Sent);

        sign(&store, &row.signing_token, "Dana", Utc::now())
            .await
            .unwrap();
        let resend = mark_sent(&store, owner, row.id).await;
        assert!(matches!(resend, Err(AppError::AlreadySigned)));
    }

    #[tokio::test]
    async fn test_owner_reads_are_scoped_to_owner() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let row = created(&store, owner).await;

        assert_eq!(get_owned(&store, owner, row.id).await.unwrap().id, row.id);
        let stranger = get_owned(&store, Uuid::new_v4(), row.id).await;
        assert!(matches!(stranger, Err(AppError::NotFound(_))));
        let stranger_send = mark_sent(&store, Uuid::new_v4(), row.id).await;
        assert!(matches!(stranger_send, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_log_revision_is_never_clamped() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let row = created(&store, owner).await;

        let mut last = None;
        for _ in 0..5 {
            last = Some(log_revision(&store, owner, row.id).await.unwrap());
        }
        let summary = last.unwrap();
        assert_eq!(summary.revisions_used, 5);
        assert_eq!(summary.revision_limit, 2);
        assert!(summary.limit_reached);
    }

    #[tokio::test]
    async fn test_limit_indicator_flips_at_limit() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let row = created(&store, owner).await;

        assert!(!log_revision(&store, owner, row.id).await.unwrap().limit_reached);
        assert!(log_revision(&store, owner, row.id).await.unwrap().limit_reached);
    }

    #[tokio::test]
    async fn test_public_view_hides_owner_fields() {
        let store = MemoryStore::default();
        let row = created(&store, Uuid::new_v4()).await;
        let public = get_public(&store, &row.signing_token).await.unwrap();
        let json = serde_json::to_value(&public).unwrap();
        assert_eq!(json["id"], serde_json::json!(row.id));
        assert!(json.get("user_id").is_none());
        assert!(json.get("signing_token").is_none());
        assert!(json.get("client_email").is_none());
        assert!(json.get("revisions_used").is_none());
    }
}

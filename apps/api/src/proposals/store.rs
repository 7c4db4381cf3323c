//! Proposal Store: key-based reads and single-row writes against `projects` and `profiles`.
//!
//! `AppState` holds an `Arc<dyn ProposalStore>`; `PgProposalStore` is the production backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::proposal::{NewProposal, ProposalRow};
use crate::models::user::ProfileRow;

/// Storage contract for proposal records.
///
/// Conditional writes (`mark_sent`, `sign`, `increment_revisions`) return `None`
/// when no row matched; the lifecycle controller decides what that means.
#[async_trait]
pub trait ProposalStore: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, AppError>;

    /// Records owned by `user_id` with `created_at >= since`.
    async fn count_created_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError>;

    /// Inserts as `draft` with `revisions_used = 0` and no signature.
    async fn insert(&self, proposal: NewProposal) -> Result<ProposalRow, AppError>;

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<ProposalRow>, AppError>;

    /// Newest first.
    async fn list_owned(&self, user_id: Uuid) -> Result<Vec<ProposalRow>, AppError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<ProposalRow>, AppError>;

    /// Sets `sent` unless the record is already signed.
    async fn mark_sent(&self, user_id: Uuid, id: Uuid) -> Result<Option<ProposalRow>, AppError>;

    /// Sets `signed`, `signed_at` and `client_signature` unless already signed.
    async fn sign(
        &self,
        token: &str,
        signer_name: &str,
        signed_at: DateTime<Utc>,
    ) -> Result<Option<ProposalRow>, AppError>;

    /// `revisions_used + 1` as one statement.
    async fn increment_revisions(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ProposalRow>, AppError>;
}

pub struct PgProposalStore {
    pool: PgPool,
}

impl PgProposalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProposalStore for PgProposalStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ProfileRow>("SELECT id, full_name, plan FROM profiles WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn count_created_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM projects WHERE user_id = $1 AND created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn insert(&self, proposal: NewProposal) -> Result<ProposalRow, AppError> {
        Ok(sqlx::query_as::<_, ProposalRow>(
            r#"
            INSERT INTO projects
                (user_id, title, client_name, client_email, project_type, deliverables,
                 timeline, price, revision_limit, payment_terms, proposal_content,
                 signing_token, status, revisions_used)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'draft', 0)
            RETURNING *
            "#,
        )
        .bind(proposal.user_id)
        .bind(&proposal.title)
        .bind(&proposal.client_name)
        .bind(&proposal.client_email)
        .bind(&proposal.project_type)
        .bind(&proposal.deliverables)
        .bind(&proposal.timeline)
        .bind(proposal.price)
        .bind(proposal.revision_limit)
        .bind(&proposal.payment_terms)
        .bind(&proposal.proposal_content)
        .bind(&proposal.signing_token)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<ProposalRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ProposalRow>("SELECT * FROM projects WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_owned(&self, user_id: Uuid) -> Result<Vec<ProposalRow>, AppError> {
        Ok(sqlx::query_as::<_, ProposalRow>(
            "SELECT * FROM projects WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ProposalRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ProposalRow>("SELECT * FROM projects WHERE signing_token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn mark_sent(&self, user_id: Uuid, id: Uuid) -> Result<Option<ProposalRow>, AppError> {
        Ok(sqlx::query_as::<_, ProposalRow>(
            r#"
            UPDATE projects SET status = 'sent'
            WHERE id = $1 AND user_id = $2 AND status <> 'signed'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn sign(
        &self,
        token: &str,
        signer_name: &str,
        signed_at: DateTime<Utc>,
    ) -> Result<Option<ProposalRow>, AppError> {
        Ok(sqlx::query_as::<_, ProposalRow>(
            r#"
            UPDATE projects
            SET status = 'signed', signed_at = $2, client_signature = $3
            WHERE signing_token = $1 AND status <> 'signed'
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(signed_at)
        .bind(signer_name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn increment_revisions(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ProposalRow>, AppError> {
        Ok(sqlx::query_as::<_, ProposalRow>(
            r#"
            UPDATE projects SET revisions_used = revisions_used + 1
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}

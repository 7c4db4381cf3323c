use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::proposals::lifecycle::ProposalStatus;

/// One row of `projects`: a client project and its generated proposal document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProposalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub project_type: String,
    pub deliverables: String,
    pub timeline: String,
    pub price: f64,
    pub revision_limit: i32,
    pub revisions_used: i32,
    pub payment_terms: String,
    pub proposal_content: String,
    pub status: ProposalStatus,
    pub signing_token: String,
    pub signed_at: Option<DateTime<Utc>>,
    pub client_signature: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Column values for a freshly generated proposal. Status, counters and
/// signature fields are fixed by the insert itself.
#[derive(Debug, Clone)]
pub struct NewProposal {
    pub user_id: Uuid,
    pub title: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub project_type: String,
    pub deliverables: String,
    pub timeline: String,
    pub price: f64,
    pub revision_limit: i32,
    pub payment_terms: String,
    pub proposal_content: String,
    pub signing_token: String,
}

/// What a signing-token holder may see. Omits the owner, the client's email,
/// the token itself and the revision counter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicProposal {
    pub id: Uuid,
    pub title: String,
    pub client_name: String,
    pub project_type: String,
    pub deliverables: String,
    pub timeline: String,
    pub price: f64,
    pub revision_limit: i32,
    pub payment_terms: String,
    pub proposal_content: String,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub signed_at: Option<DateTime<Utc>>,
    pub client_signature: Option<String>,
}

impl From<ProposalRow> for PublicProposal {
    fn from(row: ProposalRow) -> Self {
        PublicProposal {
            id: row.id,
            title: row.title,
            client_name: row.client_name,
            project_type: row.project_type,
            deliverables: row.deliverables,
            timeline: row.timeline,
            price: row.price,
            revision_limit: row.revision_limit,
            payment_terms: row.payment_terms,
            proposal_content: row.proposal_content,
            status: row.status,
            created_at: row.created_at,
            signed_at: row.signed_at,
            client_signature: row.client_signature,
        }
    }
}

//! Axum route handlers for the Proposal API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::proposal::{ProposalRow, PublicProposal};
use crate::models::user::PlanTier;
use crate::proposals::composer::{compose_proposal, CreateProposalRequest, Freelancer};
use crate::proposals::lifecycle::{self, ProposalStatus, RevisionSummary};
use crate::proposals::quota::enforce_monthly_quota;
use crate::proposals::scope_alert::{compose_scope_alert, ScopeAlertRequest};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateProposalResponse {
    pub id: Uuid,
    pub proposal: String,
    pub status: ProposalStatus,
    pub signing_url: String,
}

#[derive(Debug, Serialize)]
pub struct ProposalDetailResponse {
    pub proposal: ProposalRow,
    pub signing_url: String,
    pub revisions: RevisionSummary,
}

#[derive(Debug, Serialize)]
pub struct ProposalListResponse {
    pub proposals: Vec<ProposalRow>,
}

#[derive(Debug, Serialize)]
pub struct PublicProposalResponse {
    pub proposal: PublicProposal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub client_signature: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignResponse {
    pub success: bool,
    pub signed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ScopeAlertResponse {
    pub email: String,
}

fn detail(state: &AppState, proposal: ProposalRow) -> ProposalDetailResponse {
    ProposalDetailResponse {
        signing_url: state.config.signing_url(&proposal.signing_token),
        revisions: RevisionSummary::from(&proposal),
        proposal,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Owner handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/proposals
///
/// validate → free-tier check → draft via the generator → insert as `draft`.
/// Validation and quota failures return before the generator is called.
pub async fn handle_create_proposal(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    AppJson(request): AppJson<CreateProposalRequest>,
) -> Result<(StatusCode, Json<CreateProposalResponse>), AppError> {
    let input = request.validate()?;

    let profile = state.store.find_profile(identity.user_id).await?;
    let plan = profile
        .as_ref()
        .map(|p| p.plan_tier())
        .unwrap_or(PlanTier::Free);
    enforce_monthly_quota(state.store.as_ref(), identity.user_id, &plan, Utc::now()).await?;

    let freelancer = Freelancer::resolve(&identity, profile.as_ref());
    let content = compose_proposal(state.generator.as_ref(), &freelancer, &input).await?;

    let row = lifecycle::create(state.store.as_ref(), identity.user_id, input, content).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProposalResponse {
            id: row.id,
            signing_url: state.config.signing_url(&row.signing_token),
            status: row.status,
            proposal: row.proposal_content,
        }),
    ))
}

/// GET /api/v1/proposals
pub async fn handle_list_proposals(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<ProposalListResponse>, AppError> {
    let proposals = lifecycle::list_owned(state.store.as_ref(), identity.user_id).await?;
    Ok(Json(ProposalListResponse { proposals }))
}

/// GET /api/v1/proposals/:id
pub async fn handle_get_proposal(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProposalDetailResponse>, AppError> {
    let proposal = lifecycle::get_owned(state.store.as_ref(), identity.user_id, id).await?;
    Ok(Json(detail(&state, proposal)))
}

/// POST /api/v1/proposals/:id/send
pub async fn handle_mark_sent(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProposalDetailResponse>, AppError> {
    let proposal = lifecycle::mark_sent(state.store.as_ref(), identity.user_id, id).await?;
    Ok(Json(detail(&state, proposal)))
}

/// POST /api/v1/proposals/:id/revisions
///
/// Records one used revision. Going past the limit only flips `limit_reached`.
pub async fn handle_log_revision(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RevisionSummary>, AppError> {
    let summary = lifecycle::log_revision(state.store.as_ref(), identity.user_id, id).await?;
    Ok(Json(summary))
}

/// POST /api/v1/scope-alerts
pub async fn handle_scope_alert(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    AppJson(request): AppJson<ScopeAlertRequest>,
) -> Result<Json<ScopeAlertResponse>, AppError> {
    let context = match request.project_id {
        Some(project_id) => {
            // Validate the body before touching the store.
            request.client_request()?;
            let project =
                lifecycle::get_owned(state.store.as_ref(), identity.user_id, project_id).await?;
            request.project_context(&project)?
        }
        None => request.inline_context()?,
    };

    let email = compose_scope_alert(state.generator.as_ref(), &context).await?;
    Ok(Json(ScopeAlertResponse { email }))
}

// ────────────────────────────────────────────────────────────────────────────
// Public (signing-token) handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/public/proposals/:token
pub async fn handle_get_public_proposal(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<PublicProposalResponse>, AppError> {
    let proposal = lifecycle::get_public(state.store.as_ref(), &token).await?;
    Ok(Json(PublicProposalResponse { proposal }))
}

/// POST /api/v1/public/proposals/:token/sign
///
/// No authentication: possession of the token is the capability.
pub async fn handle_sign_proposal(
    State(state): State<AppState>,
    Path(token): Path<String>,
    AppJson(request): AppJson<SignRequest>,
) -> Result<Json<SignResponse>, AppError> {
    let signer = request.client_signature.unwrap_or_default();
    let row = lifecycle::sign(state.store.as_ref(), &token, &signer, Utc::now()).await?;
    info!("Signature recorded for proposal {}", row.id);
    Ok(Json(SignResponse {
        success: true,
        signed_at: row.signed_at,
    }))
}

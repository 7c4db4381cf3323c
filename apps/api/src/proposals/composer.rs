//! Draft Composer: turns the proposal form into a finished proposal document.
//!
//! Flow: validate → derive pricing terms and exclusions → fill prompt →
//!       one generation call → document text (or the fixed fallback).
//!
//! Persistence is the caller's job; nothing here touches the store.

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::auth::Identity;
use crate::errors::AppError;
use crate::llm_client::prompts::render_template;
use crate::llm_client::{GenerationParams, TextGenerator};
use crate::models::user::ProfileRow;
use crate::proposals::category::ProjectCategory;
use crate::proposals::prompts::PROPOSAL_PROMPT_TEMPLATE;

pub const PROPOSAL_GENERATION: GenerationParams = GenerationParams {
    max_tokens: 3000,
    temperature: 0.7,
};
pub const PROPOSAL_FALLBACK: &str = "Failed to generate proposal.";
pub const DEFAULT_REVISION_LIMIT: i32 = 2;
pub const DEFAULT_HOURLY_RATE: u64 = 75;
const HOURS_PER_PROJECT_VALUE: u64 = 20;
const DEFAULT_FREELANCER_NAME: &str = "Freelancer";

// ────────────────────────────────────────────────────────────────────────────
// Request / input types
// ────────────────────────────────────────────────────────────────────────────

/// Body of `POST /api/v1/proposals`, field names as the web form sends them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalRequest {
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub title: Option<String>,
    pub project_type: Option<String>,
    pub deliverables: Option<String>,
    pub timeline: Option<String>,
    pub price: Option<String>,
    /// Number or numeric string; anything unparsable falls back to 2.
    #[serde(default)]
    pub revision_limit: Value,
    pub payment_terms: Option<String>,
}

/// A validated proposal form with derived values resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalInput {
    pub client_name: String,
    pub client_email: Option<String>,
    pub title: String,
    /// Label exactly as submitted; `category` is its resolved rule-table entry.
    pub project_type: String,
    pub category: ProjectCategory,
    pub deliverables: String,
    pub timeline: String,
    pub price_text: String,
    pub price: f64,
    pub revision_limit: i32,
    pub payment_terms: String,
}

/// Name and email the proposal is prepared by.
#[derive(Debug, Clone, PartialEq)]
pub struct Freelancer {
    pub name: String,
    pub email: String,
}

impl Freelancer {
    /// Profile name, then identity metadata name, then a generic label.
    pub fn resolve(identity: &Identity, profile: Option<&ProfileRow>) -> Self {
        let name = profile
            .and_then(|p| p.full_name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or(identity.full_name.as_deref())
            .unwrap_or(DEFAULT_FREELANCER_NAME)
            .to_string();
        Freelancer {
            name,
            email: identity.email.clone().unwrap_or_default(),
        }
    }
}

impl CreateProposalRequest {
    /// Checks required fields and resolves derived values.
    /// Fails before any external call when a required field is blank.
    pub fn validate(&self) -> Result<ProposalInput, AppError> {
        let required = [
            ("clientName", &self.client_name),
            ("title", &self.title),
            ("projectType", &self.project_type),
            ("deliverables", &self.deliverables),
            ("price", &self.price),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| non_blank(value).is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let project_type = trimmed_or_empty(&self.project_type);
        let price_text = trimmed_or_empty(&self.price);

        Ok(ProposalInput {
            client_name: trimmed_or_empty(&self.client_name),
            client_email: non_blank(&self.client_email).map(str::to_string),
            title: trimmed_or_empty(&self.title),
            category: ProjectCategory::from_label(&project_type),
            project_type,
            deliverables: trimmed_or_empty(&self.deliverables),
            timeline: trimmed_or_empty(&self.timeline),
            price: parse_price(&price_text),
            price_text,
            revision_limit: parse_revision_limit(&self.revision_limit),
            payment_terms: trimmed_or_empty(&self.payment_terms),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn trimmed_or_empty(value: &Option<String>) -> String {
    non_blank(value).unwrap_or_default().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Derived values
// ────────────────────────────────────────────────────────────────────────────

/// Stored price: digits and dots only, longest leading decimal, 0 when nothing parses.
/// `"$2,000"` → 2000, `"$1,250.50 USD"` → 1250.5.
pub fn parse_price(price: &str) -> f64 {
    let mut seen_dot = false;
    let number: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .take_while(|c| {
            if *c == '.' {
                if seen_dot {
                    return false;
                }
                seen_dot = true;
            }
            true
        })
        .collect();
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Project value used for the overage rate: every non-digit stripped, 0 when no
/// digits remain. Values past `u64::MAX` saturate.
pub fn project_value(price: &str) -> u64 {
    let digits: String = price.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// `round(value / 20)`, or 75 when that rounds to zero.
pub fn overage_hourly_rate(project_value: u64) -> u64 {
    match project_value.saturating_add(HOURS_PER_PROJECT_VALUE / 2) / HOURS_PER_PROJECT_VALUE {
        0 => DEFAULT_HOURLY_RATE,
        rate => rate,
    }
}

/// Leading integer of a number or numeric string; 2 when absent, zero or negative.
pub fn parse_revision_limit(value: &Value) -> i32 {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(s),
        _ => None,
    };
    parsed
        .filter(|n| *n > 0)
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(DEFAULT_REVISION_LIMIT)
}

fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits: String = body.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<i64>().ok().map(|n| sign * n)
}

// ────────────────────────────────────────────────────────────────────────────
// Composition
// ────────────────────────────────────────────────────────────────────────────

/// Builds the drafting prompt. Deterministic for a given input.
pub fn build_proposal_prompt(freelancer: &Freelancer, input: &ProposalInput) -> String {
    let hourly_rate = overage_hourly_rate(project_value(&input.price_text)).to_string();
    let revision_limit = input.revision_limit.to_string();
    let first_billable_revision = (input.revision_limit + 1).to_string();
    let exclusions = input.category.numbered_exclusions();

    render_template(
        PROPOSAL_PROMPT_TEMPLATE,
        &[
            ("freelancer_name", &freelancer.name),
            ("freelancer_email", &freelancer.email),
            ("client_name", &input.client_name),
            ("title", &input.title),
            ("project_type", &input.project_type),
            ("deliverables", &input.deliverables),
            ("timeline", &input.timeline),
            ("price", &input.price_text),
            ("revision_limit", &revision_limit),
            ("first_billable_revision", &first_billable_revision),
            ("hourly_rate", &hourly_rate),
            ("exclusions", &exclusions),
            ("payment_terms", &input.payment_terms),
        ],
    )
}

/// Drafts the proposal document. One generation call, no retry, no shape check.
pub async fn compose_proposal(
    generator: &dyn TextGenerator,
    freelancer: &Freelancer,
    input: &ProposalInput,
) -> Result<String, AppError> {
    let prompt = build_proposal_prompt(freelancer, input);
    info!(
        "Drafting proposal '{}' ({} rules) for client {}",
        input.title,
        input.category.label(),
        input.client_name
    );

    let content = generator.generate(&prompt, PROPOSAL_GENERATION).await?;
    Ok(content.unwrap_or_else(|| {
        warn!("Generator returned no proposal text; storing fallback");
        PROPOSAL_FALLBACK.to_string()
    }))
}

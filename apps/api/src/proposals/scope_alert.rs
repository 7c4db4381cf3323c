//! Scope alert: drafts the reply email for an out-of-scope client request.
//!
//! Same contract as the proposal composer, smaller prompt, no category table.
//! Project numbers come from the caller's stored proposal when `projectId` is
//! given, otherwise from the request body.

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::render_template;
use crate::llm_client::{GenerationParams, TextGenerator};
use crate::models::proposal::ProposalRow;
use crate::proposals::prompts::SCOPE_ALERT_PROMPT_TEMPLATE;

pub const SCOPE_ALERT_GENERATION: GenerationParams = GenerationParams {
    max_tokens: 500,
    temperature: 0.7,
};
pub const SCOPE_ALERT_FALLBACK: &str = "Failed to generate response.";
const NOT_SPECIFIED: &str = "not specified";

/// Body of `POST /api/v1/scope-alerts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeAlertRequest {
    pub client_request: Option<String>,
    pub project_id: Option<Uuid>,
    pub original_deliverables: Option<String>,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub revision_limit: Value,
    #[serde(default)]
    pub revisions_used: Value,
}

/// Everything the email prompt needs, already rendered as text.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeAlertContext {
    pub client_request: String,
    pub original_deliverables: String,
    pub price: String,
    pub revision_limit: String,
    pub revisions_used: String,
}

impl ScopeAlertRequest {
    /// The trimmed client request, or a validation error when blank.
    pub fn client_request(&self) -> Result<&str, AppError> {
        self.client_request
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::Validation("Client request is required".to_string()))
    }

    /// Context from the request body alone.
    pub fn inline_context(&self) -> Result<ScopeAlertContext, AppError> {
        Ok(ScopeAlertContext {
            client_request: self.client_request()?.to_string(),
            original_deliverables: self
                .original_deliverables
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or(NOT_SPECIFIED)
                .to_string(),
            price: display_value(&self.price),
            revision_limit: display_value(&self.revision_limit),
            revisions_used: display_value(&self.revisions_used),
        })
    }

    /// Context taken from a stored proposal; only the client request comes from the body.
    pub fn project_context(&self, project: &ProposalRow) -> Result<ScopeAlertContext, AppError> {
        Ok(ScopeAlertContext {
            client_request: self.client_request()?.to_string(),
            original_deliverables: project.deliverables.clone(),
            price: format!("${}", project.price),
            revision_limit: project.revision_limit.to_string(),
            revisions_used: project.revisions_used.to_string(),
        })
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => NOT_SPECIFIED.to_string(),
        Value::String(s) if s.trim().is_empty() => NOT_SPECIFIED.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

pub fn build_scope_alert_prompt(context: &ScopeAlertContext) -> String {
    render_template(
        SCOPE_ALERT_PROMPT_TEMPLATE,
        &[
            ("original_deliverables", &context.original_deliverables),
            ("price", &context.price),
            ("revision_limit", &context.revision_limit),
            ("revisions_used", &context.revisions_used),
            ("client_request", &context.client_request),
        ],
    )
}

/// Drafts the scope-alert email. One generation call, no retry.
pub async fn compose_scope_alert(
    generator: &dyn TextGenerator,
    context: &ScopeAlertContext,
) -> Result<String, AppError> {
    let prompt = build_scope_alert_prompt(context);
    info!("Drafting scope alert email");

    let content = generator.generate(&prompt, SCOPE_ALERT_GENERATION).await?;
    Ok(content.unwrap_or_else(|| {
        warn!("Generator returned no scope alert text; using fallback");
        SCOPE_ALERT_FALLBACK.to_string()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGenerator;
    use serde_json::json;

    fn request() -> ScopeAlertRequest {
        ScopeAlertRequest {
            client_request: Some("Can you also build a blog section?".to_string()),
            project_id: None,
            original_deliverables: Some("5 page website".to_string()),
            price: json!("$2,000"),
            revision_limit: json!(3),
            revisions_used: json!("1"),
        }
    }

    #[test]
    fn test_blank_client_request_is_rejected() {
        let request = ScopeAlertRequest {
            client_request: Some("  ".to_string()),
            ..request()
        };
        assert!(matches!(
            request.inline_context(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_inline_context_renders_mixed_values() {
        let context = request().inline_context().unwrap();
        assert_eq!(context.price, "$2,000");
        assert_eq!(context.revision_limit, "3");
        assert_eq!(context.revisions_used, "1");

        let sparse = ScopeAlertRequest {
            original_deliverables: None,
            price: Value::Null,
            ..request()
        }
        .inline_context()
        .unwrap();
        assert_eq!(sparse.original_deliverables, "not specified");
        assert_eq!(sparse.price, "not specified");
    }

    #[test]
    fn test_prompt_embeds_request_and_numbers() {
        let prompt = build_scope_alert_prompt(&request().inline_context().unwrap());
        assert!(prompt.contains("Client's new request: Can you also build a blog section?"));
        assert!(prompt.contains("Agreed price: $2,000"));
        assert!(prompt.contains("Revisions used so far: 1"));
    }

    #[tokio::test]
    async fn test_compose_uses_small_output_bound_and_fallback() {
        let generator = FakeGenerator::empty();
        let email = compose_scope_alert(&generator, &request().inline_context().unwrap())
            .await
            .unwrap();
        assert_eq!(email, SCOPE_ALERT_FALLBACK);
        assert_eq!(generator.calls()[0].1, SCOPE_ALERT_GENERATION);
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Freelancer profile row, keyed by the identity service's user id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub plan: Option<String>,
}

/// Billing tier. Anything other than the literal `free` label counts as paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanTier {
    Free,
    Paid(String),
}

impl PlanTier {
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            None | Some("") | Some("free") => PlanTier::Free,
            Some(other) => PlanTier::Paid(other.to_string()),
        }
    }
}

impl ProfileRow {
    pub fn plan_tier(&self) -> PlanTier {
        PlanTier::from_label(self.plan.as_deref())
    }
}

//! Free-tier gating, evaluated once per proposal creation before any generation call.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::PlanTier;
use crate::proposals::store::ProposalStore;

/// Proposals a free-tier user may create per calendar month.
pub const FREE_MONTHLY_PROPOSAL_LIMIT: i64 = 2;

/// Midnight UTC on the first day of `now`'s month.
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Refuses creation with `FreeLimitReached` once a free-tier user hits the monthly cap.
/// Paid tiers are never counted.
pub async fn enforce_monthly_quota(
    store: &dyn ProposalStore,
    user_id: Uuid,
    plan: &PlanTier,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if let PlanTier::Paid(label) = plan {
        debug!("User {user_id} on plan '{label}', no monthly cap");
        return Ok(());
    }

    let created = store
        .count_created_since(user_id, start_of_month(now))
        .await?;
    if created >= FREE_MONTHLY_PROPOSAL_LIMIT {
        info!("User {user_id} hit the free plan limit ({created} this month)");
        return Err(AppError::FreeLimitReached);
    }
    Ok(())
}

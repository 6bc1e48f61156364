use std::time::Instant;

use chrono::Utc;

use crate::db;
use crate::error::AppError;
use crate::models::Lead;
use crate::state::SharedState;

use super::metadata::ClientMeta;
use super::validator::{self, LeadForm};

/// Run one submission through validate, rate-check, persist and notify.
///
/// Nothing is written unless validation and the rate check both pass. The
/// lead is committed before the notification is queued, and the
/// notification outcome never reaches the caller.
pub async fn run(state: &SharedState, meta: &ClientMeta, form: LeadForm) -> Result<Lead, AppError> {
    let new_lead = validator::validate(&form)?;

    state
        .submission_limiter
        .admit(meta.ip, Instant::now())
        .map_err(|retry_after| {
            tracing::debug!("Rate limited {} (retry after {retry_after}s)", meta.ip);
            AppError::RateLimited(retry_after)
        })?;

    let lead = db::leads::create(
        &state.pool,
        &new_lead,
        &meta.ip.to_string(),
        meta.user_agent.as_deref(),
        Utc::now(),
    )
    .await?;

    tracing::info!("Lead {} received from {}", lead.id, lead.company);

    state.notifier.notify_lead(&lead);

    Ok(lead)
}

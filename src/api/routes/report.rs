//! Issue Report Route
//!
//! - POST /api/report-issue - Validate a report and forward it to the relay

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{IssueReport, RelayPayload};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::sanitize;

/// POST /api/report-issue
///
/// Validates required fields first, then the email shape, and forwards the
/// composed payload to the relay exactly once.
pub async fn report_issue(
    State(state): State<Arc<AppState>>,
    body: Result<Json<IssueReport>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(report) = body?;

    validate_report(&report)?;

    let payload = RelayPayload::from_report(&report, state.default_recipient.as_deref());

    tracing::info!(
        email = %payload.email,
        subject = %payload.subject,
        priority = %payload.priority,
        preview = %sanitize::preview(report.description.as_deref().unwrap_or_default(), 60),
        "Forwarding issue report"
    );

    let result = state.relay.forward(&payload).await?;

    tracing::info!(subject = %payload.subject, "Issue report relayed");
    Ok(Json(result))
}

fn validate_report(report: &IssueReport) -> ApiResult<()> {
    let missing = report.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    if !report.has_valid_email() {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}

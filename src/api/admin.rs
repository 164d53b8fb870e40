//! Privileged operations. The identity provider in front of this service is
//! trusted to only route admins here.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::db::{AdminNotification, PlatformStats};
use crate::domain::AccountId;
use crate::engine::SweepSummary;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCodeRequest {
    #[serde(default = "default_code_amount")]
    pub amount: f64,
    /// When set, the account's pending payment notifications are marked
    /// handled.
    pub account_id: Option<AccountId>,
}

fn default_code_amount() -> f64 {
    50.0
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCodeResponse {
    pub code: String,
    pub amount: f64,
}

pub async fn issue_code(
    State(state): State<AppState>,
    Json(req): Json<IssueCodeRequest>,
) -> Result<Json<IssueCodeResponse>, AppError> {
    let code = state.workflow.issue_code(req.amount, req.account_id).await?;
    Ok(Json(IssueCodeResponse {
        code,
        amount: req.amount,
    }))
}

pub async fn fleet_sweep(
    State(state): State<AppState>,
) -> Result<Json<SweepSummary>, AppError> {
    let summary = state.batch.fleet_sweep().await?;
    Ok(Json(summary))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<PlatformStats>, AppError> {
    Ok(Json(state.repo.platform_stats().await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub notifications: Vec<AdminNotification>,
}

pub async fn notifications(
    State(state): State<AppState>,
) -> Result<Json<NotificationsResponse>, AppError> {
    let notifications = state.repo.unread_notifications(20).await?;
    Ok(Json(NotificationsResponse { notifications }))
}

pub async fn mark_read(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.repo.mark_notification_read(id).await? {
        return Err(AppError::NotFound(format!("notification {}", id)));
    }
    Ok(Json(serde_json::json!({ "read": true })))
}

pub async fn deactivate(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.workflow.deactivate(AccountId::new(id)).await?;
    Ok(Json(serde_json::json!({ "deactivated": true })))
}

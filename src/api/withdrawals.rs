use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::AccountId;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub account_id: AccountId,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalResponse {
    pub debited: f64,
    pub message: String,
}

pub async fn request_withdrawal(
    State(state): State<AppState>,
    Json(req): Json<WithdrawalRequest>,
) -> Result<Json<WithdrawalResponse>, AppError> {
    state
        .workflow
        .request_withdrawal(req.account_id, req.amount)
        .await?;
    Ok(Json(WithdrawalResponse {
        debited: req.amount,
        message: "Withdrawal request submitted.".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayFeeRequest {
    pub account_id: AccountId,
}

pub async fn pay_fee(
    State(state): State<AppState>,
    Json(req): Json<PayFeeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.workflow.pay_withdrawal_fee(req.account_id).await?;
    Ok(Json(serde_json::json!({ "feePaid": true })))
}

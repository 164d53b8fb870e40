use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::AccountId;
use crate::error::AppError;

/// The payment-verification collaborator reports a confirmed deposit here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmDepositRequest {
    pub account_id: AccountId,
    pub amount: f64,
    #[serde(default = "default_asset")]
    pub asset: String,
    pub tx_hash: Option<String>,
}

fn default_asset() -> String {
    "ethereum".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmDepositResponse {
    pub credited: f64,
    pub message: String,
}

pub async fn confirm_deposit(
    State(state): State<AppState>,
    Json(req): Json<ConfirmDepositRequest>,
) -> Result<Json<ConfirmDepositResponse>, AppError> {
    state
        .workflow
        .confirm_deposit(req.account_id, req.amount, &req.asset, req.tx_hash.as_deref())
        .await?;

    Ok(Json(ConfirmDepositResponse {
        credited: req.amount,
        message: "Deposit credited. An unlock code will be issued by an administrator."
            .to_string(),
    }))
}

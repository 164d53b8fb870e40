use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::AccountId;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub account_id: AccountId,
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub code: String,
    pub amount: f64,
    pub first_trade_profit: f64,
    pub first_trade_status: String,
}

pub async fn redeem(
    State(state): State<AppState>,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>, AppError> {
    let result = state.workflow.redeem(&req.code, req.account_id).await?;
    Ok(Json(RedeemResponse {
        code: result.code,
        amount: result.amount,
        first_trade_profit: result.first_trade.trade.profit,
        first_trade_status: result.first_trade.trade.status.to_string(),
    }))
}

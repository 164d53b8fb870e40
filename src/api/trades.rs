use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::AccountId;
use crate::engine::AutoTradeSummary;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub account_id: AccountId,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResponse {
    pub profit: f64,
    pub status: String,
    pub tier: &'static str,
    pub amount: f64,
    pub timestamp: i64,
}

pub async fn execute_trade(
    State(state): State<AppState>,
    Json(req): Json<TradeRequest>,
) -> Result<Json<TradeResponse>, AppError> {
    state.workflow.ensure_can_trade(req.account_id).await?;

    let outcome = state.engine.run_trade(req.account_id, req.amount).await?;
    Ok(Json(TradeResponse {
        profit: outcome.trade.profit,
        status: outcome.trade.status.to_string(),
        tier: outcome.tier,
        amount: outcome.trade.amount,
        timestamp: outcome.trade.timestamp,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTradeRequest {
    pub account_id: AccountId,
}

pub async fn auto_trade(
    State(state): State<AppState>,
    Json(req): Json<AutoTradeRequest>,
) -> Result<Json<AutoTradeSummary>, AppError> {
    let summary = state.batch.auto_trade(req.account_id).await?;
    Ok(Json(summary))
}

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{Account, AccountId, Tier, Trade};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub referred_by: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: AccountId,
    pub username: String,
    pub referral_code: String,
    pub balance: f64,
    pub invested: f64,
    pub profits: f64,
    pub total_deposited: f64,
    pub support_fee_paid: bool,
    pub bot_unlocked: bool,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlock_code_used: Option<String>,
    pub tier: &'static str,
}

impl AccountDto {
    fn from_account(account: Account) -> Self {
        let tier = Tier::classify(account.invested).name;
        Self {
            id: account.id,
            username: account.username,
            referral_code: account.referral_code,
            balance: account.balance,
            invested: account.invested,
            profits: account.profits,
            total_deposited: account.total_deposited,
            support_fee_paid: account.support_fee_paid,
            bot_unlocked: account.bot_unlocked,
            active: account.active,
            unlock_code_used: account.unlock_code_used,
            tier,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummaryResponse {
    #[serde(flatten)]
    pub account: AccountDto,
    pub can_trade: bool,
    pub recent_trades: Vec<TradeDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDto {
    pub amount: f64,
    pub profit: f64,
    pub status: String,
    pub timestamp: i64,
}

impl TradeDto {
    pub(crate) fn from_trade(trade: &Trade) -> Self {
        Self {
            amount: trade.amount,
            profit: trade.profit,
            status: trade.status.to_string(),
            timestamp: trade.timestamp,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AccountDto>, AppError> {
    let account = state
        .workflow
        .register(&req.username, req.referred_by.as_deref())
        .await?;
    Ok(Json(AccountDto::from_account(account)))
}

pub async fn get_summary(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<AccountSummaryResponse>, AppError> {
    let account_id = AccountId::new(id);
    let account = state
        .repo
        .get_account(account_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("account {}", account_id)))?;

    let can_trade = account.can_trade();
    let recent = state.repo.recent_trades(account_id, 10).await?;

    Ok(Json(AccountSummaryResponse {
        account: AccountDto::from_account(account),
        can_trade,
        recent_trades: recent.iter().map(TradeDto::from_trade).collect(),
    }))
}

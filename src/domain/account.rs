//! Ledger account state.

use crate::domain::AccountId;
use serde::{Deserialize, Serialize};

/// A ledger account.
///
/// `balance` is only ever moved by trade outcomes, confirmed deposits,
/// referral bonuses, and withdrawals. `profits` is only moved by trade
/// outcomes and always equals the sum of the account's trade profits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub balance: f64,
    /// Cumulative amount that has unlocked trading; drives tier selection.
    pub invested: f64,
    /// Cumulative signed sum of all trade outcomes.
    pub profits: f64,
    /// Cumulative raw deposits, independent of tier.
    pub total_deposited: f64,
    pub support_fee_paid: bool,
    pub unlock_code_used: Option<String>,
    pub bot_unlocked: bool,
    /// Soft-delete flag; deactivated accounts keep their trade history.
    pub active: bool,
    /// Creation time in milliseconds since Unix epoch.
    pub created_at: i64,
}

impl Account {
    /// Whether this account may invoke the outcome engine.
    pub fn can_trade(&self) -> bool {
        self.bot_unlocked && self.active
    }
}

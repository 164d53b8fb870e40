//! Domain primitives: AccountId, TradeStatus, currency rounding.

use serde::{Deserialize, Serialize};

/// Ledger account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl AccountId {
    /// Create an AccountId from its row id.
    pub fn new(id: i64) -> Self {
        AccountId(id)
    }

    /// Get the underlying id value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a single trade: Profit or Loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    /// The trade ended with a positive profit.
    Profit,
    /// The trade ended with a loss (negative profit).
    Loss,
}

impl TradeStatus {
    /// Parse a stored status string. Unknown values fall back to Loss.
    pub fn from_db(s: &str) -> Self {
        match s {
            "profit" => TradeStatus::Profit,
            _ => TradeStatus::Loss,
        }
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeStatus::Profit => write!(f, "profit"),
            TradeStatus::Loss => write!(f, "loss"),
        }
    }
}

/// Round a currency amount to 2 decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

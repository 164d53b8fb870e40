//! Immutable trade outcome record.

use crate::domain::{AccountId, TradeStatus};
use serde::{Deserialize, Serialize};

/// A single recorded trade outcome.
///
/// Created exactly once per outcome-engine invocation, never mutated or
/// deleted. The account reference is weak: deactivating an account leaves
/// its trades in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub account_id: AccountId,
    /// Stake the outcome was computed from.
    pub amount: f64,
    /// Signed outcome; positive for Profit, negative for Loss.
    pub profit: f64,
    pub status: TradeStatus,
    /// Time of the trade in milliseconds since Unix epoch.
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_serialization() {
        let trade = Trade {
            id: 7,
            account_id: AccountId::new(3),
            amount: 100.0,
            profit: -12.5,
            status: TradeStatus::Loss,
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&trade).unwrap();
        assert_eq!(json["status"], "loss");
        assert_eq!(json["account_id"], 3);
    }
}

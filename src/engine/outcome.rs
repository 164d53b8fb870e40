//! The outcome engine: converts a stake into a fabricated profit or loss.

use crate::db::{Repository, TradeInputs};
use crate::domain::{round_cents, AccountId, Tier, Trade, TradeStatus};
use crate::engine::rng::RandomSource;
use crate::error::AppError;
use crate::notify::NotificationSink;
use std::sync::Arc;
use tracing::info;

/// Minimum profit fraction on the success branch.
const PROFIT_FLOOR: f64 = 0.02;
/// Hard cap on the adjusted success rate.
const SUCCESS_RATE_CAP: f64 = 0.95;

/// Result of a single engine invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOutcome {
    pub trade: Trade,
    pub tier: &'static str,
    pub adjusted_success_rate: f64,
}

/// Draws tier-weighted outcomes and writes them to the ledger.
pub struct OutcomeEngine {
    repo: Arc<Repository>,
    random: Arc<dyn RandomSource>,
    sink: Arc<dyn NotificationSink>,
}

impl OutcomeEngine {
    pub fn new(
        repo: Arc<Repository>,
        random: Arc<dyn RandomSource>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self { repo, random, sink }
    }

    /// Execute one trade for the account and commit it to the ledger.
    ///
    /// The trade insert and the account's `profits`/`balance` update commit
    /// in one transaction; a store failure there surfaces as
    /// `TradeExecutionFailed` with nothing written.
    pub async fn run_trade(
        &self,
        account_id: AccountId,
        amount: f64,
    ) -> Result<TradeOutcome, AppError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::Validation(
                "trade amount must be a positive number".to_string(),
            ));
        }

        // Accounts that predate the ledger have no row; treat the stake as
        // their invested amount.
        let inputs = self
            .repo
            .trade_inputs(account_id)
            .await?
            .unwrap_or(TradeInputs {
                invested: amount,
                profits: 0.0,
                total_deposited: 0.0,
            });

        let tier = Tier::classify(inputs.invested);
        let adjusted_success_rate =
            adjusted_success_rate(tier, inputs.profits, inputs.total_deposited);

        let (profit, status) = if self.random.unit() < adjusted_success_rate {
            let multiplier = self.random.normal(tier.profit_mean, tier.profit_stddev);
            // The floor wins even when the multiplier draw implies a loss.
            let profit = (amount * (multiplier - 1.0)).max(amount * PROFIT_FLOOR);
            (profit, TradeStatus::Profit)
        } else {
            let loss_fraction = self.random.uniform(tier.loss_lo, tier.loss_hi);
            (-amount * loss_fraction, TradeStatus::Loss)
        };

        let profit = round_cents(profit);

        let trade = self
            .repo
            .commit_trade(account_id, amount, profit, status)
            .await
            .map_err(|e| AppError::TradeExecutionFailed(e.to_string()))?;

        info!(
            account = %account_id,
            tier = tier.name,
            %status,
            profit,
            amount,
            "trade executed"
        );
        self.sink
            .notify(&format!(
                "{} trade: account {} {} of ${:.2} on ${:.2} stake",
                tier.name,
                account_id,
                status,
                profit.abs(),
                amount
            ))
            .await;

        Ok(TradeOutcome {
            trade,
            tier: tier.name,
            adjusted_success_rate,
        })
    }
}

/// Success rate adjusted by historical performance, capped at 0.95.
///
/// The denominator is `total_deposited` (not `invested`), preserved exactly
/// from the original outcome contract.
pub fn adjusted_success_rate(tier: &Tier, profits: f64, total_deposited: f64) -> f64 {
    let experience_factor = (profits / total_deposited.max(1.0)).clamp(0.5, 2.0);
    (tier.success_rate * experience_factor).min(SUCCESS_RATE_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjusted_rate_zero_deposited() {
        // profits / max(0, 1) = 0 -> clamped to 0.5
        let tier = Tier::classify(1500.0);
        assert_eq!(adjusted_success_rate(tier, 0.0, 0.0), 0.85 * 0.5);
    }

    #[test]
    fn test_adjusted_rate_capped() {
        let tier = Tier::classify(1500.0);
        // factor clamps at 2.0 -> 1.7, capped at 0.95
        assert_eq!(adjusted_success_rate(tier, 5000.0, 1000.0), 0.95);
    }

    #[test]
    fn test_adjusted_rate_vip_scenario() {
        // invested=1500 (VIP), profits=0, deposited=1000 -> 0.85 * 0.5
        let tier = Tier::classify(1500.0);
        assert_eq!(adjusted_success_rate(tier, 0.0, 1000.0), 0.425);
    }

    #[test]
    fn test_adjusted_rate_bounds_property() {
        let cases = [
            (0.0, 0.0),
            (-500.0, 100.0),
            (1e9, 1.0),
            (0.01, 1e9),
            (-1e9, 1e-9),
        ];
        for tier_invested in [0.0, 100.0, 200.0, 500.0, 1000.0] {
            let tier = Tier::classify(tier_invested);
            for (profits, deposited) in cases {
                let rate = adjusted_success_rate(tier, profits, deposited);
                assert!((0.0..=0.95).contains(&rate), "rate {} out of range", rate);
            }
        }
    }
}

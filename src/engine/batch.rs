//! Batch runner: repeated outcome-engine invocations for one or all accounts.
//!
//! Every trade in a batch is an independent financial event. A failing trade
//! is logged and skipped; it never rolls back earlier trades or aborts the
//! rest of the batch.

use crate::db::Repository;
use crate::domain::{round_cents, AccountId};
use crate::engine::outcome::OutcomeEngine;
use crate::engine::rng::RandomSource;
use crate::error::AppError;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

const AUTO_TRADE_MIN: u32 = 3;
const AUTO_TRADE_MAX: u32 = 8;
const TRADE_AMOUNT_FLOOR: f64 = 50.0;
const AUTO_TRADE_AMOUNT_CAP: f64 = 200.0;
const AUTO_TRADE_INVESTED_SHARE: f64 = 0.2;
const SWEEP_PROBABILITY: f64 = 0.4;
const SWEEP_AMOUNT_CAP: f64 = 500.0;
const SWEEP_INVESTED_SHARE: f64 = 0.3;

/// Outcome of a self-serve auto-trade run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTradeSummary {
    pub trades_executed: u32,
    pub profitable_trades: u32,
    pub losing_trades: u32,
    pub total_profit: f64,
}

/// Outcome of a fleet sweep across all eligible accounts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSummary {
    pub accounts_considered: u32,
    pub trades_executed: u32,
    pub total_profit: f64,
}

pub struct BatchRunner {
    repo: Arc<Repository>,
    engine: Arc<OutcomeEngine>,
    random: Arc<dyn RandomSource>,
}

impl BatchRunner {
    pub fn new(
        repo: Arc<Repository>,
        engine: Arc<OutcomeEngine>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            repo,
            engine,
            random,
        }
    }

    /// Run a burst of 3..=8 trades for one unlocked account.
    pub async fn auto_trade(&self, account_id: AccountId) -> Result<AutoTradeSummary, AppError> {
        if !self.repo.can_trade(account_id).await? {
            return Err(AppError::NotUnlocked);
        }

        let invested = self
            .repo
            .trade_inputs(account_id)
            .await?
            .map(|i| i.invested)
            .unwrap_or(100.0);

        let trades_count = self.random.int_range(AUTO_TRADE_MIN, AUTO_TRADE_MAX);
        let mut summary = AutoTradeSummary {
            trades_executed: 0,
            profitable_trades: 0,
            losing_trades: 0,
            total_profit: 0.0,
        };

        for _ in 0..trades_count {
            let amount = self.random.uniform(
                TRADE_AMOUNT_FLOOR,
                (invested * AUTO_TRADE_INVESTED_SHARE).min(AUTO_TRADE_AMOUNT_CAP),
            );
            match self.engine.run_trade(account_id, amount).await {
                Ok(outcome) => {
                    summary.trades_executed += 1;
                    summary.total_profit += outcome.trade.profit;
                    if outcome.trade.profit > 0.0 {
                        summary.profitable_trades += 1;
                    } else {
                        summary.losing_trades += 1;
                    }
                }
                Err(e) => {
                    // Isolate-and-continue: earlier trades in this batch stand.
                    warn!(account = %account_id, error = %e, "auto-trade step failed");
                }
            }
        }

        summary.total_profit = round_cents(summary.total_profit);
        info!(
            account = %account_id,
            executed = summary.trades_executed,
            total_profit = summary.total_profit,
            "auto-trade completed"
        );
        Ok(summary)
    }

    /// Privileged sweep: every active, unlocked, invested account trades once
    /// with probability 0.4.
    pub async fn fleet_sweep(&self) -> Result<SweepSummary, AppError> {
        let candidates = self.repo.sweep_candidates().await?;
        let mut summary = SweepSummary {
            accounts_considered: candidates.len() as u32,
            trades_executed: 0,
            total_profit: 0.0,
        };

        for (account_id, invested) in candidates {
            if self.random.unit() >= SWEEP_PROBABILITY {
                continue;
            }
            let amount = self.random.uniform(
                TRADE_AMOUNT_FLOOR,
                (invested * SWEEP_INVESTED_SHARE).min(SWEEP_AMOUNT_CAP),
            );
            match self.engine.run_trade(account_id, amount).await {
                Ok(outcome) => {
                    summary.trades_executed += 1;
                    summary.total_profit += outcome.trade.profit;
                }
                Err(e) => {
                    warn!(account = %account_id, error = %e, "sweep trade failed, continuing");
                }
            }
        }

        summary.total_profit = round_cents(summary.total_profit);
        info!(
            considered = summary.accounts_considered,
            executed = summary.trades_executed,
            total_profit = summary.total_profit,
            "fleet sweep completed"
        );
        Ok(summary)
    }
}

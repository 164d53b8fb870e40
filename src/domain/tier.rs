//! Investment tier classification.
//!
//! A tier bundles the statistical parameters the outcome engine draws from.
//! Classification is a pure, total function of cumulative invested amount;
//! thresholds are matched in descending order, first match wins.

use serde::Serialize;

/// A named bracket of outcome parameters selected by invested amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tier {
    pub name: &'static str,
    /// Minimum invested amount for this tier.
    pub min_invested: f64,
    /// Base probability that a trade resolves as a profit.
    pub success_rate: f64,
    /// Mean of the normal profit-multiplier distribution.
    pub profit_mean: f64,
    /// Standard deviation of the profit-multiplier distribution.
    pub profit_stddev: f64,
    /// Lower bound of the uniform loss-fraction range.
    pub loss_lo: f64,
    /// Upper bound of the uniform loss-fraction range.
    pub loss_hi: f64,
}

const VIP: Tier = Tier {
    name: "VIP",
    min_invested: 1000.0,
    success_rate: 0.85,
    profit_mean: 2.5,
    profit_stddev: 0.4,
    loss_lo: 0.02,
    loss_hi: 0.08,
};

const GOLD: Tier = Tier {
    name: "Gold",
    min_invested: 500.0,
    success_rate: 0.80,
    profit_mean: 2.0,
    profit_stddev: 0.3,
    loss_lo: 0.03,
    loss_hi: 0.10,
};

const SILVER: Tier = Tier {
    name: "Silver",
    min_invested: 200.0,
    success_rate: 0.75,
    profit_mean: 1.6,
    profit_stddev: 0.25,
    loss_lo: 0.05,
    loss_hi: 0.15,
};

const BRONZE: Tier = Tier {
    name: "Bronze",
    min_invested: 100.0,
    success_rate: 0.65,
    profit_mean: 1.3,
    profit_stddev: 0.15,
    loss_lo: 0.08,
    loss_hi: 0.20,
};

const STARTER: Tier = Tier {
    name: "Starter",
    min_invested: 0.0,
    success_rate: 0.40,
    profit_mean: 1.1,
    profit_stddev: 0.08,
    loss_lo: 0.15,
    loss_hi: 0.35,
};

/// All tiers, highest threshold first.
pub const TIERS: [Tier; 5] = [VIP, GOLD, SILVER, BRONZE, STARTER];

impl Tier {
    /// Classify an invested amount into its tier.
    pub fn classify(invested: f64) -> &'static Tier {
        for tier in &TIERS {
            if invested >= tier.min_invested {
                return tier;
            }
        }
        // Starter has a zero threshold, so negative/NaN-free inputs always
        // match above; keep a total function regardless.
        &TIERS[4]
    }
}

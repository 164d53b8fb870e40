//! Outcome generation: random draws, the single-trade engine, and batches.

pub mod batch;
pub mod outcome;
pub mod rng;

pub use batch::{AutoTradeSummary, BatchRunner, SweepSummary};
pub use outcome::{OutcomeEngine, TradeOutcome};
pub use rng::{RandomSource, ScriptedRandom, ThreadRandom};

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod notify;
pub mod workflow;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{Account, AccountId, Tier, Trade, TradeStatus, UnlockCode};
pub use engine::{BatchRunner, OutcomeEngine, RandomSource, ScriptedRandom, ThreadRandom};
pub use error::AppError;
pub use notify::{LogSink, NotificationSink, RecordingSink, WebhookSink};
pub use workflow::UnlockWorkflow;

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::{AdminNotification, PlatformStats, Repository, TradeInputs};

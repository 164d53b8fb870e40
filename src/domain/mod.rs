pub mod account;
pub mod primitives;
pub mod tier;
pub mod trade;
pub mod unlock_code;

pub use account::Account;
pub use primitives::{round_cents, AccountId, TradeStatus};
pub use tier::Tier;
pub use trade::Trade;
pub use unlock_code::UnlockCode;

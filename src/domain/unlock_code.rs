//! Single-use unlock codes gating trading access.

use crate::domain::AccountId;
use rand::Rng;
use serde::{Deserialize, Serialize};

const CODE_PREFIX: &str = "TRADE";
const CODE_SUFFIX_LEN: usize = 6;
const REFERRAL_CODE_LEN: usize = 8;
const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A single-use token bound to a deposit amount.
///
/// Issued by an admin in the unused state; `used = false -> true` is a
/// terminal transition bound atomically to the redeeming account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockCode {
    pub code: String,
    /// Deposit amount the first trade is executed with on redemption.
    pub amount: f64,
    pub used: bool,
    pub used_by: Option<AccountId>,
    /// Redemption time in milliseconds since Unix epoch.
    pub used_at: Option<i64>,
    pub created_at: i64,
}

impl UnlockCode {
    /// Generate a fresh unlock code token, e.g. `TRADE7KQ2XC`.
    pub fn generate<R: Rng>(rng: &mut R) -> String {
        format!("{}{}", CODE_PREFIX, random_token(rng, CODE_SUFFIX_LEN))
    }

    /// Normalize a user-submitted code for lookup.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_uppercase()
    }
}

/// Generate an 8-character referral code.
pub fn generate_referral_code<R: Rng>(rng: &mut R) -> String {
    random_token(rng, REFERRAL_CODE_LEN)
}

fn random_token<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

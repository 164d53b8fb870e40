//! Account workflow: registration, deposit confirmation, unlock-code
//! issuance and redemption, withdrawals.
//!
//! Unlocking is a one-way gate. A confirmed deposit only credits the ledger
//! and asks an admin for a code; the account trades only after redeeming
//! that code.

use crate::config::Config;
use crate::db::Repository;
use crate::domain::{unlock_code::generate_referral_code, Account, AccountId, UnlockCode};
use crate::engine::outcome::{OutcomeEngine, TradeOutcome};
use crate::error::AppError;
use crate::notify::NotificationSink;
use std::sync::Arc;
use tracing::info;

const MIN_USERNAME_LEN: usize = 3;
const CODE_INSERT_ATTEMPTS: usize = 5;

/// Result of redeeming an unlock code: the gate opens and the bound amount
/// is traded once immediately.
#[derive(Debug, Clone)]
pub struct RedeemResult {
    pub code: String,
    pub amount: f64,
    pub first_trade: TradeOutcome,
}

pub struct UnlockWorkflow {
    repo: Arc<Repository>,
    engine: Arc<OutcomeEngine>,
    sink: Arc<dyn NotificationSink>,
    config: Config,
}

impl UnlockWorkflow {
    pub fn new(
        repo: Arc<Repository>,
        engine: Arc<OutcomeEngine>,
        sink: Arc<dyn NotificationSink>,
        config: Config,
    ) -> Self {
        Self {
            repo,
            engine,
            sink,
            config,
        }
    }

    /// Register a new account, crediting the referrer's bonus when a valid
    /// referral code is supplied.
    pub async fn register(
        &self,
        username: &str,
        referred_by: Option<&str>,
    ) -> Result<Account, AppError> {
        let username = username.trim();
        if username.len() < MIN_USERNAME_LEN {
            return Err(AppError::Validation(format!(
                "username must be at least {} characters",
                MIN_USERNAME_LEN
            )));
        }

        let referred_by = referred_by.map(str::trim).filter(|s| !s.is_empty());

        let mut last_err = None;
        for _ in 0..CODE_INSERT_ATTEMPTS {
            let referral_code = generate_referral_code(&mut rand::thread_rng());
            match self
                .repo
                .create_account(username, &referral_code, referred_by)
                .await
            {
                Ok(id) => {
                    if let Some(referrer) = referred_by {
                        if self
                            .repo
                            .apply_referral_bonus(referrer, self.config.referral_bonus)
                            .await?
                        {
                            self.sink
                                .notify(&format!(
                                    "Referral bonus: ${:.2} to code {}",
                                    self.config.referral_bonus, referrer
                                ))
                                .await;
                        }
                    }
                    self.sink
                        .notify(&format!("New account registered: {}", username))
                        .await;
                    return self
                        .repo
                        .get_account(id)
                        .await?
                        .ok_or_else(|| AppError::NotFound("account vanished".to_string()));
                }
                Err(e) if is_unique_violation(&e) => {
                    let msg = e.to_string();
                    if msg.contains("referral_code") {
                        // Token collision; draw another.
                        last_err = Some(e);
                        continue;
                    }
                    return Err(AppError::Validation("username already exists".to_string()));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(last_err
            .map(AppError::from)
            .unwrap_or_else(|| AppError::StoreUnavailable("referral code generation".into())))
    }

    /// Redeem an unlock code for an account and run the first trade with the
    /// code's bound amount.
    ///
    /// The `used` flip is compare-and-swap: of two concurrent redemptions of
    /// the same code, exactly one succeeds and the other gets
    /// `CodeAlreadyUsed`.
    pub async fn redeem(
        &self,
        raw_code: &str,
        account_id: AccountId,
    ) -> Result<RedeemResult, AppError> {
        let code = UnlockCode::normalize(raw_code);
        if code.is_empty() {
            return Err(AppError::Validation("unlock code must not be empty".to_string()));
        }

        let record = self
            .repo
            .get_unlock_code(&code)
            .await?
            .ok_or(AppError::InvalidCode)?;
        if record.used {
            return Err(AppError::CodeAlreadyUsed);
        }

        if !self.repo.claim_code(&code, account_id).await? {
            // Lost the race after the initial read.
            return Err(AppError::CodeAlreadyUsed);
        }

        info!(account = %account_id, code = %code, "bot unlocked");
        let first_trade = self.engine.run_trade(account_id, record.amount).await?;

        self.sink
            .notify(&format!(
                "Bot unlocked: account {} used code {}. First trade profit: ${:.2}",
                account_id, code, first_trade.trade.profit
            ))
            .await;

        Ok(RedeemResult {
            code,
            amount: record.amount,
            first_trade,
        })
    }

    /// Apply a confirmed deposit (the payment collaborator already verified
    /// it): credit the ledger and raise an admin notification requesting an
    /// unlock code. Does not unlock the account.
    pub async fn confirm_deposit(
        &self,
        account_id: AccountId,
        amount: f64,
        asset: &str,
        tx_hash: Option<&str>,
    ) -> Result<(), AppError> {
        if !amount.is_finite() || amount < self.config.min_deposit {
            return Err(AppError::Validation(format!(
                "minimum deposit is ${:.2}",
                self.config.min_deposit
            )));
        }
        if self.repo.get_account(account_id).await?.is_none() {
            return Err(AppError::NotFound(format!("account {}", account_id)));
        }

        let asset = asset.trim().to_lowercase();
        let wallet = self.config.deposit_wallets.get(&asset).map(String::as_str);
        self.repo
            .credit_deposit(account_id, amount, &asset, wallet, tx_hash)
            .await?;

        self.repo
            .create_admin_notification(
                account_id,
                &format!(
                    "Account {} deposited ${:.2}. Please issue an unlock code.",
                    account_id, amount
                ),
                "payment",
            )
            .await?;

        self.sink
            .notify(&format!(
                "Payment confirmed: ${:.2} in {} by account {}",
                amount, asset, account_id
            ))
            .await;

        Ok(())
    }

    /// Issue a fresh single-use code bound to a deposit amount. When issued
    /// for a specific account, that account's pending payment notifications
    /// are marked handled.
    pub async fn issue_code(
        &self,
        amount: f64,
        for_account: Option<AccountId>,
    ) -> Result<String, AppError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::Validation(
                "code amount must be a positive number".to_string(),
            ));
        }

        let mut code = None;
        for _ in 0..CODE_INSERT_ATTEMPTS {
            let candidate = UnlockCode::generate(&mut rand::thread_rng());
            if self.repo.insert_unlock_code(&candidate, amount).await? {
                code = Some(candidate);
                break;
            }
        }
        let code = code.ok_or_else(|| {
            AppError::StoreUnavailable("could not allocate a unique unlock code".to_string())
        })?;

        if let Some(account_id) = for_account {
            self.repo.mark_payment_notifications_read(account_id).await?;
            self.sink
                .notify(&format!(
                    "Unlock code {} (${:.2}) issued for account {}",
                    code, amount, account_id
                ))
                .await;
        }

        info!(code = %code, amount, "unlock code issued");
        Ok(code)
    }

    pub async fn can_trade(&self, account_id: AccountId) -> Result<bool, AppError> {
        Ok(self.repo.can_trade(account_id).await?)
    }

    /// Gate used by every trade entry point.
    pub async fn ensure_can_trade(&self, account_id: AccountId) -> Result<(), AppError> {
        if self.can_trade(account_id).await? {
            Ok(())
        } else {
            Err(AppError::NotUnlocked)
        }
    }

    /// Debit a withdrawal request. Requires the support fee flag and a
    /// sufficient balance.
    pub async fn request_withdrawal(
        &self,
        account_id: AccountId,
        amount: f64,
    ) -> Result<(), AppError> {
        if !amount.is_finite() || amount < self.config.min_withdrawal {
            return Err(AppError::Validation(format!(
                "minimum withdrawal is ${:.2}",
                self.config.min_withdrawal
            )));
        }

        let account = self
            .repo
            .get_account(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account {}", account_id)))?;
        if !account.support_fee_paid {
            return Err(AppError::Validation(
                "withdrawal fee must be paid first".to_string(),
            ));
        }

        if !self.repo.debit_balance(account_id, amount).await? {
            return Err(AppError::Validation("insufficient balance".to_string()));
        }

        self.sink
            .notify(&format!(
                "Withdrawal request: ${:.2} by account {}",
                amount, account_id
            ))
            .await;
        Ok(())
    }

    pub async fn pay_withdrawal_fee(&self, account_id: AccountId) -> Result<(), AppError> {
        if !self.repo.mark_fee_paid(account_id).await? {
            return Err(AppError::NotFound(format!("account {}", account_id)));
        }
        Ok(())
    }

    /// Soft-delete an account. Its trades and ledger history stay intact.
    pub async fn deactivate(&self, account_id: AccountId) -> Result<(), AppError> {
        if !self.repo.deactivate_account(account_id).await? {
            return Err(AppError::NotFound(format!("account {}", account_id)));
        }
        self.sink
            .notify(&format!("Account {} deactivated", account_id))
            .await;
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

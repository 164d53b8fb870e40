//! Repository layer: the single storage interface for the ledger.
//!
//! Accounts, trades, unlock codes, deposits, and admin notifications all go
//! through here; callers never see the backend. Trade commits and code
//! redemptions run inside transactions so the ledger invariants hold under
//! concurrent requests.

use crate::domain::{Account, AccountId, Trade, TradeStatus, UnlockCode};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

/// Ledger fields the outcome engine reads before a trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeInputs {
    pub invested: f64,
    pub profits: f64,
    pub total_deposited: f64,
}

/// A pending or handled admin notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNotification {
    pub id: i64,
    pub account_id: AccountId,
    pub message: String,
    pub kind: String,
    pub read: bool,
    pub timestamp: i64,
}

/// Aggregate platform counters for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_accounts: i64,
    pub invested_accounts: i64,
    pub unlocked_accounts: i64,
    pub total_balance: f64,
    pub total_invested: f64,
    pub total_profits: f64,
    pub used_codes: i64,
    pub available_codes: i64,
}

/// Repository for ledger operations.
pub struct Repository {
    pool: SqlitePool,
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    // --- accounts ---

    /// Create an account. Fails on duplicate username or referral code.
    pub async fn create_account(
        &self,
        username: &str,
        referral_code: &str,
        referred_by: Option<&str>,
    ) -> Result<AccountId, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (username, referral_code, referred_by, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(referral_code)
        .bind(referred_by)
        .bind(now_ms())
        .execute(&self.pool)
        .await?;

        Ok(AccountId::new(result.last_insert_rowid()))
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, username, referral_code, referred_by, balance, invested,
                   profits, total_deposited, support_fee_paid, unlock_code_used,
                   bot_unlocked, active, created_at
            FROM accounts WHERE id = ?
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Account {
            id: AccountId::new(r.get("id")),
            username: r.get("username"),
            referral_code: r.get("referral_code"),
            referred_by: r.get("referred_by"),
            balance: r.get("balance"),
            invested: r.get("invested"),
            profits: r.get("profits"),
            total_deposited: r.get("total_deposited"),
            support_fee_paid: r.get("support_fee_paid"),
            unlock_code_used: r.get("unlock_code_used"),
            bot_unlocked: r.get("bot_unlocked"),
            active: r.get("active"),
            created_at: r.get("created_at"),
        }))
    }

    /// Read the ledger fields the outcome engine needs. `None` for accounts
    /// that have no ledger row yet.
    pub async fn trade_inputs(&self, id: AccountId) -> Result<Option<TradeInputs>, sqlx::Error> {
        let row =
            sqlx::query("SELECT invested, profits, total_deposited FROM accounts WHERE id = ?")
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|r| TradeInputs {
            invested: r.get("invested"),
            profits: r.get("profits"),
            total_deposited: r.get("total_deposited"),
        }))
    }

    /// Whether an account may trade: unlocked and active. Missing accounts
    /// may not.
    pub async fn can_trade(&self, id: AccountId) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT bot_unlocked, active FROM accounts WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row
            .map(|r| r.get::<bool, _>("bot_unlocked") && r.get::<bool, _>("active"))
            .unwrap_or(false))
    }

    /// Soft-delete an account; its trades are preserved.
    pub async fn deactivate_account(&self, id: AccountId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE accounts SET active = 0 WHERE id = ?")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- trades ---

    /// Atomically append a trade record and apply its profit to the account.
    ///
    /// This is the only path that mutates `profits`/`balance` from a trade.
    /// Both writes commit together or not at all, which keeps `profits`
    /// equal to the sum of the account's trade profits. The account update
    /// is a no-op for pre-ledger accounts; the trade is still recorded.
    pub async fn commit_trade(
        &self,
        account_id: AccountId,
        amount: f64,
        profit: f64,
        status: TradeStatus,
    ) -> Result<Trade, sqlx::Error> {
        let timestamp = now_ms();
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO trades (account_id, amount, profit, status, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(account_id.as_i64())
        .bind(amount)
        .bind(profit)
        .bind(status.to_string())
        .bind(timestamp)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE accounts SET profits = profits + ?, balance = balance + ? WHERE id = ?")
            .bind(profit)
            .bind(profit)
            .bind(account_id.as_i64())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Trade {
            id: inserted.last_insert_rowid(),
            account_id,
            amount,
            profit,
            status,
            timestamp,
        })
    }

    /// Most recent trades for an account, newest first.
    pub async fn recent_trades(
        &self,
        account_id: AccountId,
        limit: i64,
    ) -> Result<Vec<Trade>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, amount, profit, status, timestamp
            FROM trades WHERE account_id = ?
            ORDER BY timestamp DESC, id DESC LIMIT ?
            "#,
        )
        .bind(account_id.as_i64())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| Trade {
                id: r.get("id"),
                account_id: AccountId::new(r.get("account_id")),
                amount: r.get("amount"),
                profit: r.get("profit"),
                status: TradeStatus::from_db(r.get::<String, _>("status").as_str()),
                timestamp: r.get("timestamp"),
            })
            .collect())
    }

    /// Sum of all trade profits for an account (consistency checks).
    pub async fn sum_trade_profits(&self, account_id: AccountId) -> Result<f64, sqlx::Error> {
        let row =
            sqlx::query("SELECT COALESCE(SUM(profit), 0) AS total FROM trades WHERE account_id = ?")
                .bind(account_id.as_i64())
                .fetch_one(&self.pool)
                .await?;
        Ok(row.get("total"))
    }

    pub async fn count_trades(&self, account_id: AccountId) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM trades WHERE account_id = ?")
            .bind(account_id.as_i64())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    // --- unlock codes ---

    /// Insert a fresh unused code. Returns false if the code already exists.
    pub async fn insert_unlock_code(&self, code: &str, amount: f64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO unlock_codes (code, amount, used, created_at)
            VALUES (?, ?, 0, ?)
            ON CONFLICT(code) DO NOTHING
            "#,
        )
        .bind(code)
        .bind(amount)
        .bind(now_ms())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_unlock_code(&self, code: &str) -> Result<Option<UnlockCode>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT code, amount, used, used_by, used_at, created_at FROM unlock_codes WHERE code = ?",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UnlockCode {
            code: r.get("code"),
            amount: r.get("amount"),
            used: r.get("used"),
            used_by: r.get::<Option<i64>, _>("used_by").map(AccountId::new),
            used_at: r.get("used_at"),
            created_at: r.get("created_at"),
        }))
    }

    /// Compare-and-swap redemption: flips `used = 0 -> 1`, binds the code to
    /// the account, and unlocks the account, all in one transaction.
    ///
    /// Returns false when the code was already consumed; of two concurrent
    /// redemptions exactly one sees true.
    pub async fn claim_code(
        &self,
        code: &str,
        account_id: AccountId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query(
            "UPDATE unlock_codes SET used = 1, used_by = ?, used_at = ? WHERE code = ? AND used = 0",
        )
        .bind(account_id.as_i64())
        .bind(now_ms())
        .bind(code)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE accounts SET bot_unlocked = 1, unlock_code_used = ? WHERE id = ?")
            .bind(code)
            .bind(account_id.as_i64())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    // --- deposits ---

    /// Record a confirmed deposit and credit balance, invested, and
    /// total_deposited in one transaction.
    pub async fn credit_deposit(
        &self,
        account_id: AccountId,
        amount: f64,
        asset: &str,
        wallet_address: Option<&str>,
        tx_hash: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO deposits (account_id, amount, asset, wallet_address, tx_hash, status, timestamp)
            VALUES (?, ?, ?, ?, ?, 'confirmed', ?)
            "#,
        )
        .bind(account_id.as_i64())
        .bind(amount)
        .bind(asset)
        .bind(wallet_address)
        .bind(tx_hash)
        .bind(now_ms())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE accounts
            SET balance = balance + ?, invested = invested + ?, total_deposited = total_deposited + ?
            WHERE id = ?
            "#,
        )
        .bind(amount)
        .bind(amount)
        .bind(amount)
        .bind(account_id.as_i64())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    // --- balance paths: referral bonus, withdrawal, fee flag ---

    /// Credit the referral bonus to the account owning `referral_code`.
    pub async fn apply_referral_bonus(
        &self,
        referral_code: &str,
        bonus: f64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE accounts SET balance = balance + ? WHERE referral_code = ?")
            .bind(bonus)
            .bind(referral_code)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Conditionally debit a withdrawal; false when balance is insufficient.
    pub async fn debit_balance(
        &self,
        account_id: AccountId,
        amount: f64,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE accounts SET balance = balance - ? WHERE id = ? AND balance >= ?")
                .bind(amount)
                .bind(account_id.as_i64())
                .bind(amount)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_fee_paid(&self, account_id: AccountId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE accounts SET support_fee_paid = 1 WHERE id = ?")
            .bind(account_id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- batch support ---

    /// Accounts eligible for a fleet sweep: active, unlocked, invested.
    pub async fn sweep_candidates(&self) -> Result<Vec<(AccountId, f64)>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT id, invested FROM accounts WHERE invested > 0 AND bot_unlocked = 1 AND active = 1",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| (AccountId::new(r.get("id")), r.get::<f64, _>("invested")))
            .collect())
    }

    // --- admin notifications ---

    pub async fn create_admin_notification(
        &self,
        account_id: AccountId,
        message: &str,
        kind: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO admin_notifications (account_id, message, kind, read, timestamp) VALUES (?, ?, ?, 0, ?)",
        )
        .bind(account_id.as_i64())
        .bind(message)
        .bind(kind)
        .bind(now_ms())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn unread_notifications(
        &self,
        limit: i64,
    ) -> Result<Vec<AdminNotification>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, message, kind, read, timestamp
            FROM admin_notifications WHERE read = 0
            ORDER BY timestamp DESC, id DESC LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| AdminNotification {
                id: r.get("id"),
                account_id: AccountId::new(r.get("account_id")),
                message: r.get("message"),
                kind: r.get("kind"),
                read: r.get("read"),
                timestamp: r.get("timestamp"),
            })
            .collect())
    }

    pub async fn mark_notification_read(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE admin_notifications SET read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark an account's pending payment notifications handled once a code
    /// has been issued for it.
    pub async fn mark_payment_notifications_read(
        &self,
        account_id: AccountId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE admin_notifications SET read = 1 WHERE account_id = ? AND kind = 'payment' AND read = 0",
        )
        .bind(account_id.as_i64())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // --- stats ---

    pub async fn platform_stats(&self) -> Result<PlatformStats, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM accounts) AS total_accounts,
                (SELECT COUNT(*) FROM accounts WHERE invested > 0) AS invested_accounts,
                (SELECT COUNT(*) FROM accounts WHERE bot_unlocked = 1) AS unlocked_accounts,
                (SELECT COALESCE(SUM(balance), 0) FROM accounts) AS total_balance,
                (SELECT COALESCE(SUM(invested), 0) FROM accounts) AS total_invested,
                (SELECT COALESCE(SUM(profits), 0) FROM accounts) AS total_profits,
                (SELECT COUNT(*) FROM unlock_codes WHERE used = 1) AS used_codes,
                (SELECT COUNT(*) FROM unlock_codes WHERE used = 0) AS available_codes
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(PlatformStats {
            total_accounts: row.get("total_accounts"),
            invested_accounts: row.get("invested_accounts"),
            unlocked_accounts: row.get("unlocked_accounts"),
            total_balance: row.get("total_balance"),
            total_invested: row.get("total_invested"),
            total_profits: row.get("total_profits"),
            used_codes: row.get("used_codes"),
            available_codes: row.get("available_codes"),
        })
    }
}

use crate::{ledger::model::LedgerEntry, Database};
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::FindOptions;
use mongodb::ClientSession;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::info;
use utils::{AppError, AppResult};

pub type DynLedgerRepository = Arc<dyn LedgerRepositoryTrait + Send + Sync>;

pub const REASON_REFERRAL_BONUS: &str = "referral bonus";

/// 积分账本。The only interface through which balances change: every credit
/// and debit pairs the balance delta with its ledger entry inside one
/// transaction, so `Account.balance` always equals the entry sum.
///
/// The `*_in_session` variants fold the movement into a caller-owned
/// transaction (publish, resolve); on error the caller aborts the session.
#[async_trait]
pub trait LedgerRepositoryTrait {
    async fn credit(&self, telegram_id: i64, amount: f64, reason: &str) -> AppResult<LedgerEntry>;

    async fn debit(&self, telegram_id: i64, amount: f64, reason: &str) -> AppResult<LedgerEntry>;

    async fn credit_in_session(
        &self,
        session: &mut ClientSession,
        telegram_id: i64,
        amount: f64,
        reason: &str,
    ) -> AppResult<LedgerEntry>;

    async fn debit_in_session(
        &self,
        session: &mut ClientSession,
        telegram_id: i64,
        amount: f64,
        reason: &str,
    ) -> AppResult<LedgerEntry>;

    /// Referral cascade: credits the actor's referrer (one hop) the given
    /// bonus. Invoked from inside the favorable-resolution transaction, which
    /// fires at most once per row, so the bonus can never double-apply.
    /// Returns `(referrer_id, bonus)` when the cascade fired.
    async fn apply_referral_bonus_in_session(
        &self,
        session: &mut ClientSession,
        actor_id: i64,
        bonus: f64,
    ) -> AppResult<Option<(i64, f64)>>;

    async fn balance_of(&self, telegram_id: i64) -> AppResult<f64>;

    // 获取最近的账本记录(倒序)
    async fn history(&self, telegram_id: i64, limit: i64) -> AppResult<Vec<LedgerEntry>>;
}

#[async_trait]
impl LedgerRepositoryTrait for Database {
    async fn credit(&self, telegram_id: i64, amount: f64, reason: &str) -> AppResult<LedgerEntry> {
        let mut session = self.start_transaction().await?;

        match self.credit_in_session(&mut session, telegram_id, amount, reason).await {
            Ok(entry) => {
                self.commit_transaction(&mut session).await?;
                Ok(entry)
            }
            Err(e) => {
                session.abort_transaction().await.ok();
                Err(e)
            }
        }
    }

    async fn debit(&self, telegram_id: i64, amount: f64, reason: &str) -> AppResult<LedgerEntry> {
        let mut session = self.start_transaction().await?;

        match self.debit_in_session(&mut session, telegram_id, amount, reason).await {
            Ok(entry) => {
                self.commit_transaction(&mut session).await?;
                Ok(entry)
            }
            Err(e) => {
                session.abort_transaction().await.ok();
                Err(e)
            }
        }
    }

    async fn credit_in_session(
        &self,
        session: &mut ClientSession,
        telegram_id: i64,
        amount: f64,
        reason: &str,
    ) -> AppResult<LedgerEntry> {
        if amount <= 0.0 {
            return Err(AppError::BadRequest(format!("Credit amount must be positive, got {}.", amount)));
        }

        let updated = self
            .accounts
            .update_one_with_session(
                doc! { "telegram_id": telegram_id },
                doc! { "$inc": { "balance": amount } },
                None,
                session,
            )
            .await?;

        if updated.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Account with telegram_id: {} not found.",
                telegram_id
            )));
        }

        let entry = LedgerEntry::new(telegram_id, amount, reason);
        self.ledger_entries.insert_one_with_session(&entry, None, session).await?;

        info!("💰 credit: account={}, amount={}, reason={}", telegram_id, amount, reason);
        Ok(entry)
    }

    async fn debit_in_session(
        &self,
        session: &mut ClientSession,
        telegram_id: i64,
        amount: f64,
        reason: &str,
    ) -> AppResult<LedgerEntry> {
        if amount <= 0.0 {
            return Err(AppError::BadRequest(format!("Debit amount must be positive, got {}.", amount)));
        }

        // Conditional update: the filter demands a sufficient balance, so two
        // concurrent debits can never drive the balance negative.
        let updated = self
            .accounts
            .update_one_with_session(
                doc! { "telegram_id": telegram_id, "balance": { "$gte": amount } },
                doc! { "$inc": { "balance": -amount } },
                None,
                session,
            )
            .await?;

        if updated.matched_count == 0 {
            let account = self
                .accounts
                .find_one_with_session(doc! { "telegram_id": telegram_id }, None, session)
                .await?;

            return match account {
                Some(account) => Err(AppError::InsufficientFunds {
                    required: amount,
                    balance: account.balance,
                }),
                None => Err(AppError::NotFound(format!(
                    "Account with telegram_id: {} not found.",
                    telegram_id
                ))),
            };
        }

        let entry = LedgerEntry::new(telegram_id, -amount, reason);
        self.ledger_entries.insert_one_with_session(&entry, None, session).await?;

        info!("💸 debit: account={}, amount={}, reason={}", telegram_id, amount, reason);
        Ok(entry)
    }

    async fn apply_referral_bonus_in_session(
        &self,
        session: &mut ClientSession,
        actor_id: i64,
        bonus: f64,
    ) -> AppResult<Option<(i64, f64)>> {
        if bonus <= 0.0 {
            return Ok(None);
        }

        let actor = self
            .accounts
            .find_one_with_session(doc! { "telegram_id": actor_id }, None, session)
            .await?;

        let referrer_id = match actor.and_then(|account| account.referrer_id) {
            Some(referrer_id) => referrer_id,
            None => return Ok(None),
        };

        self.credit_in_session(session, referrer_id, bonus, REASON_REFERRAL_BONUS).await?;

        Ok(Some((referrer_id, bonus)))
    }

    async fn balance_of(&self, telegram_id: i64) -> AppResult<f64> {
        let account = self
            .accounts
            .find_one(doc! { "telegram_id": telegram_id }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account with telegram_id: {} not found.", telegram_id)))?;

        Ok(account.balance)
    }

    async fn history(&self, telegram_id: i64, limit: i64) -> AppResult<Vec<LedgerEntry>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .build();

        let mut cursor = self
            .ledger_entries
            .find(doc! { "telegram_id": telegram_id }, options)
            .await?;

        let mut entries = Vec::new();
        while let Some(entry) = cursor.try_next().await? {
            entries.push(entry);
        }

        Ok(entries)
    }
}

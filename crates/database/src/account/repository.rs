use crate::{account::model::Account, ledger::repository::LedgerRepositoryTrait, Database};
use async_trait::async_trait;
use mongodb::bson::doc;
use std::sync::Arc;
use tracing::info;
use utils::{is_duplicate_key_error, AppError, AppResult};

pub type DynAccountRepository = Arc<dyn AccountRepositoryTrait + Send + Sync>;

pub const REASON_SIGNUP_GRANT: &str = "signup grant";

// 主要用于Service中，表示提供了该Trait功能
#[async_trait]
pub trait AccountRepositoryTrait {
    /// 创建或返回已有账户。Creation writes the account and its signup-grant
    /// ledger entry in one transaction, so the ledger-equals-balance
    /// invariant holds from the very first row. Returns `(account, created)`.
    async fn create_or_get_account(
        &self,
        telegram_id: i64,
        signup_grant: f64,
        referrer_id: Option<i64>,
    ) -> AppResult<(Account, bool)>;

    async fn get_account(&self, telegram_id: i64) -> AppResult<Option<Account>>;

    async fn expect_account(&self, telegram_id: i64) -> AppResult<Account>;

    // 设置展示别名(TikTok用户名)
    async fn set_alias(&self, telegram_id: i64, alias: &str) -> AppResult<()>;

    async fn find_by_referral_token(&self, token: &str) -> AppResult<Option<Account>>;
}

#[async_trait]
impl AccountRepositoryTrait for Database {
    async fn create_or_get_account(
        &self,
        telegram_id: i64,
        signup_grant: f64,
        referrer_id: Option<i64>,
    ) -> AppResult<(Account, bool)> {
        if let Some(existing) = self.accounts.find_one(doc! { "telegram_id": telegram_id }, None).await? {
            return Ok((existing, false));
        }

        let mut account = Account::new(telegram_id, referrer_id);
        let mut session = self.start_transaction().await?;

        let inserted = match self.accounts.insert_one_with_session(&account, None, &mut session).await {
            Ok(result) => result,
            Err(e) => {
                session.abort_transaction().await.ok();
                if is_duplicate_key_error(&e) {
                    // Two first contacts raced; the unique index decided.
                    return match self.accounts.find_one(doc! { "telegram_id": telegram_id }, None).await? {
                        Some(existing) => Ok((existing, false)),
                        None => Err(AppError::Conflict(format!(
                            "Account with telegram_id: {} already exists.",
                            telegram_id
                        ))),
                    };
                }
                return Err(e.into());
            }
        };

        // The grant flows through the ledger like every other balance change.
        if signup_grant > 0.0 {
            if let Err(e) = self
                .credit_in_session(&mut session, telegram_id, signup_grant, REASON_SIGNUP_GRANT)
                .await
            {
                session.abort_transaction().await.ok();
                return Err(e);
            }
        }

        self.commit_transaction(&mut session).await?;
        account.id = inserted.inserted_id.as_object_id();
        account.balance = signup_grant.max(0.0);

        info!("🆕 account created: telegram_id={}, grant={}", telegram_id, signup_grant);
        Ok((account, true))
    }

    async fn get_account(&self, telegram_id: i64) -> AppResult<Option<Account>> {
        let account = self.accounts.find_one(doc! { "telegram_id": telegram_id }, None).await?;

        Ok(account)
    }

    async fn expect_account(&self, telegram_id: i64) -> AppResult<Account> {
        self.get_account(telegram_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account with telegram_id: {} not found.", telegram_id)))
    }

    async fn set_alias(&self, telegram_id: i64, alias: &str) -> AppResult<()> {
        let filter = doc! { "telegram_id": telegram_id };
        let update = doc! { "$set": { "alias": alias } };

        let updated = match self.accounts.update_one(filter, update, None).await {
            Ok(result) => result,
            Err(e) if is_duplicate_key_error(&e) => {
                return Err(AppError::Conflict(format!("Alias @{} is already taken.", alias)));
            }
            Err(e) => return Err(e.into()),
        };

        if updated.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Account with telegram_id: {} not found.",
                telegram_id
            )));
        }

        Ok(())
    }

    async fn find_by_referral_token(&self, token: &str) -> AppResult<Option<Account>> {
        let account = self.accounts.find_one(doc! { "referral_token": token }, None).await?;

        Ok(account)
    }
}

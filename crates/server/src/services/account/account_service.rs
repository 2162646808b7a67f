use async_trait::async_trait;
use database::account::repository::AccountRepositoryTrait;
use database::{Account, Database};
use std::sync::Arc;
use tracing::info;
use utils::{AppConfig, AppResult};

pub type DynAccountService = Arc<dyn AccountServiceTrait + Send + Sync>;

#[async_trait]
pub trait AccountServiceTrait {
    /// First contact: creates the account with the configured signup grant,
    /// attaching the referrer behind `referral_token` when one is presented.
    /// Existing accounts are returned untouched (the referral edge is fixed
    /// at creation). Returns `(account, created)`.
    async fn register(&self, telegram_id: i64, referral_token: Option<String>) -> AppResult<(Account, bool)>;

    async fn get_account(&self, telegram_id: i64) -> AppResult<Option<Account>>;

    async fn expect_account(&self, telegram_id: i64) -> AppResult<Account>;

    async fn set_alias(&self, telegram_id: i64, alias: String) -> AppResult<()>;
}

#[derive(Clone)]
pub struct AccountService {
    database: Arc<Database>,
    config: Arc<AppConfig>,
}

impl AccountService {
    pub fn new(database: Arc<Database>, config: Arc<AppConfig>) -> Self {
        Self { database, config }
    }
}

#[async_trait]
impl AccountServiceTrait for AccountService {
    async fn register(&self, telegram_id: i64, referral_token: Option<String>) -> AppResult<(Account, bool)> {
        let mut referrer_id = None;

        if let Some(token) = referral_token {
            match self.database.find_by_referral_token(&token).await? {
                // Self-referral carries no edge.
                Some(referrer) if referrer.telegram_id != telegram_id => {
                    referrer_id = Some(referrer.telegram_id);
                }
                Some(_) => {}
                None => {
                    info!("🔍 unknown referral token presented by {}", telegram_id);
                }
            }
        }

        self.database
            .create_or_get_account(telegram_id, self.config.signup_grant, referrer_id)
            .await
    }

    async fn get_account(&self, telegram_id: i64) -> AppResult<Option<Account>> {
        self.database.get_account(telegram_id).await
    }

    async fn expect_account(&self, telegram_id: i64) -> AppResult<Account> {
        self.database.expect_account(telegram_id).await
    }

    async fn set_alias(&self, telegram_id: i64, alias: String) -> AppResult<()> {
        self.database.set_alias(telegram_id, &alias).await
    }
}

use async_trait::async_trait;
use database::ledger::model::LedgerEntry;
use database::ledger::repository::LedgerRepositoryTrait;
use database::Database;
use std::sync::Arc;
use utils::AppResult;

pub type DynLedgerService = Arc<dyn LedgerServiceTrait + Send + Sync>;

#[async_trait]
pub trait LedgerServiceTrait {
    async fn credit(&self, telegram_id: i64, amount: f64, reason: String) -> AppResult<LedgerEntry>;
    async fn debit(&self, telegram_id: i64, amount: f64, reason: String) -> AppResult<LedgerEntry>;
    async fn balance_of(&self, telegram_id: i64) -> AppResult<f64>;
    async fn history(&self, telegram_id: i64, limit: i64) -> AppResult<Vec<LedgerEntry>>;
}

#[derive(Clone)]
pub struct LedgerService {
    database: Arc<Database>,
}

impl LedgerService {
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn credit(&self, telegram_id: i64, amount: f64, reason: String) -> AppResult<LedgerEntry> {
        let entry = self.database.credit(telegram_id, amount, &reason).await?;

        Ok(entry)
    }

    async fn debit(&self, telegram_id: i64, amount: f64, reason: String) -> AppResult<LedgerEntry> {
        let entry = self.database.debit(telegram_id, amount, &reason).await?;

        Ok(entry)
    }

    async fn balance_of(&self, telegram_id: i64) -> AppResult<f64> {
        let balance = self.database.balance_of(telegram_id).await?;

        Ok(balance)
    }

    async fn history(&self, telegram_id: i64, limit: i64) -> AppResult<Vec<LedgerEntry>> {
        let entries = self.database.history(telegram_id, limit).await?;

        Ok(entries)
    }
}

use database::ledger::model::LedgerEntry;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 账户余额响应
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct BalanceDto {
    pub telegram_id: i64,
    pub balance: f64,
}

/// 账本历史查询参数
#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default)]
pub struct HistoryQuery {
    /// Most-recent entries to return (default 10)
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

/// 单条账本记录响应
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct LedgerEntryDto {
    pub amount: f64,
    pub reason: String,
    pub created_at: i64,
}

impl From<LedgerEntry> for LedgerEntryDto {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            amount: entry.amount,
            reason: entry.reason,
            created_at: entry.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_entry_dto_keeps_signed_amount() {
        let entry = LedgerEntry::new(1001, -3.0, "publish follow");
        let dto = LedgerEntryDto::from(entry);

        assert_eq!(dto.amount, -3.0);
        assert_eq!(dto.reason, "publish follow");
    }

    #[test]
    fn test_history_query_default_limit_is_none() {
        let query = HistoryQuery::default();
        assert!(query.limit.is_none());
    }
}

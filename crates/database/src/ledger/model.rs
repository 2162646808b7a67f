use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 账本条目。One immutable fact per balance change; inserted in the same
/// transaction as the balance update it represents, never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LedgerEntry {
    /// MongoDB文档ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Owning account
    pub telegram_id: i64,
    /// Signed delta: positive for credits, negative for debits
    pub amount: f64,
    /// Human readable reason tag ("support accepted", "referral bonus", ...)
    pub reason: String,
    /// 创建时间戳
    pub created_at: i64,
}

impl LedgerEntry {
    pub fn new(telegram_id: i64, amount: f64, reason: &str) -> Self {
        Self {
            id: None,
            telegram_id,
            amount,
            reason: reason.to_string(),
            created_at: Utc::now().timestamp(),
        }
    }
}

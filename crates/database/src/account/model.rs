use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 用户模型
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Account {
    /// MongoDB文档ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Telegram user id (immutable, unique)
    pub telegram_id: i64,
    /// TikTok handle shown to other members; unique when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Always equals the running sum of the account's ledger entries
    pub balance: f64,
    /// One-hop referral edge, fixed at creation, never re-parented
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer_id: Option<i64>,
    /// Token new members register with to become referred by this account
    pub referral_token: String,
    /// 创建时间戳
    pub created_at: i64,
}

impl Account {
    /// Fresh row at balance zero; the signup grant arrives as a ledger credit
    /// in the same transaction as the insert, so even the opening balance has
    /// its entry.
    pub fn new(telegram_id: i64, referrer_id: Option<i64>) -> Self {
        Self {
            id: None,
            telegram_id,
            alias: None,
            balance: 0.0,
            referrer_id,
            referral_token: Uuid::new_v4().simple().to_string(),
            created_at: Utc::now().timestamp(),
        }
    }

    pub fn display_name(&self) -> String {
        match &self.alias {
            Some(alias) => format!("@{}", alias),
            None => self.telegram_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_starts_at_zero() {
        let account = Account::new(1001, None);

        assert_eq!(account.telegram_id, 1001);
        assert_eq!(account.balance, 0.0);
        assert!(account.alias.is_none());
        assert!(account.referrer_id.is_none());
        assert!(account.created_at > 0);

        println!("✅ 测试通过: new_account_starts_at_zero");
    }

    #[test]
    fn test_referral_tokens_are_unique() {
        let a = Account::new(1, None);
        let b = Account::new(2, None);

        assert_eq!(a.referral_token.len(), 32);
        assert_ne!(a.referral_token, b.referral_token);
    }

    #[test]
    fn test_referrer_edge_is_one_hop() {
        let referred = Account::new(2002, Some(1001));
        assert_eq!(referred.referrer_id, Some(1001));
    }

    #[test]
    fn test_display_name_prefers_alias() {
        let mut account = Account::new(3003, None);
        assert_eq!(account.display_name(), "3003");

        account.alias = Some("tiktoker".to_string());
        assert_eq!(account.display_name(), "@tiktoker");
    }
}

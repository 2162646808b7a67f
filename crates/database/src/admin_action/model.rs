use crate::status::ApprovalStatus;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Privileged mutation a moderator proposes for the primary approver to
/// ratify. The payload shape depends on the kind tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdminPayload {
    /// Signed amount: positive credits, negative debits (balance guarded).
    GrantPoints { amount: f64 },
    /// Rewrites the target's display alias.
    ChangeAlias { alias: String },
}

impl AdminPayload {
    pub fn kind_str(&self) -> &'static str {
        match self {
            AdminPayload::GrantPoints { .. } => "grant_points",
            AdminPayload::ChangeAlias { .. } => "change_alias",
        }
    }

    /// Short human description used in approval-request notifications.
    pub fn describe(&self) -> String {
        match self {
            AdminPayload::GrantPoints { amount } => format!("otorgar {} puntos", amount),
            AdminPayload::ChangeAlias { alias } => format!("cambiar alias a @{}", alias),
        }
    }
}

/// 管理操作模型。Same single-transition shape as Interaction, but the only
/// manual resolver is the configured primary approver.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdminAction {
    /// MongoDB文档ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub payload: AdminPayload,
    pub target_id: i64,
    pub proposer_id: i64,
    pub status: ApprovalStatus,
    /// 创建时间戳
    pub created_at: i64,
    pub expires_at: i64,
}

impl AdminAction {
    pub fn new_proposal(proposer_id: i64, target_id: i64, payload: AdminPayload, window_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: None,
            payload,
            target_id,
            proposer_id,
            status: ApprovalStatus::Pending,
            created_at: now,
            expires_at: now + window_secs,
        }
    }

    /// Proposal by the primary approver: no pending period, recorded already
    /// accepted.
    pub fn new_applied(proposer_id: i64, target_id: i64, payload: AdminPayload) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: None,
            payload,
            target_id,
            proposer_id,
            status: ApprovalStatus::Accepted,
            created_at: now,
            expires_at: now,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.status == ApprovalStatus::Pending && self.expires_at <= now
    }
}

use crate::status::ApprovalStatus;
use crate::support_item::model::SupportKind;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 互动模型。A claim by `actor_id` that it fulfilled `owner_id`'s support
/// item. `owner_id` and `points` are copied at creation time and never
/// re-derived, so later item or configuration changes cannot alter a claim
/// in flight.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Interaction {
    /// MongoDB文档ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub kind: SupportKind,
    pub item_id: ObjectId,
    pub actor_id: i64,
    pub owner_id: i64,
    pub status: ApprovalStatus,
    /// Points credited to the actor on a favorable resolution
    pub points: f64,
    /// 创建时间戳
    pub created_at: i64,
    /// Past this instant the expiry sweep force-resolves the claim
    pub expires_at: i64,
}

impl Interaction {
    pub fn new_claim(
        kind: SupportKind,
        item_id: ObjectId,
        actor_id: i64,
        owner_id: i64,
        points: f64,
        window_secs: i64,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: None,
            kind,
            item_id,
            actor_id,
            owner_id,
            status: ApprovalStatus::Pending,
            points,
            created_at: now,
            expires_at: now + window_secs,
        }
    }

    /// Due for auto-acceptance: still pending and past its deadline.
    pub fn is_expired(&self, now: i64) -> bool {
        self.status == ApprovalStatus::Pending && self.expires_at <= now
    }
}

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Kind of reciprocal support a published item asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportKind {
    Follow,
    Video,
    Live,
}

impl SupportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportKind::Follow => "follow",
            SupportKind::Video => "video",
            SupportKind::Live => "live",
        }
    }

    /// Noun used in user-facing bot messages.
    pub fn noun(&self) -> &'static str {
        match self {
            SupportKind::Follow => "seguimiento",
            SupportKind::Video => "video",
            SupportKind::Live => "live",
        }
    }
}

impl std::fmt::Display for SupportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SupportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow" => Ok(SupportKind::Follow),
            "video" => Ok(SupportKind::Video),
            "live" => Ok(SupportKind::Live),
            other => Err(format!("unknown support kind: {}", other)),
        }
    }
}

/// 支持项模型。Published by an account spending points; read-only afterward,
/// ownership fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SupportItem {
    /// MongoDB文档ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub owner_id: i64,
    pub kind: SupportKind,
    /// TikTok profile/video link
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 创建时间戳
    pub created_at: i64,
}

impl SupportItem {
    pub fn new(
        owner_id: i64,
        kind: SupportKind,
        link: &str,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: None,
            owner_id,
            kind,
            link: link.to_string(),
            title,
            description,
            created_at: Utc::now().timestamp(),
        }
    }
}

/// Ledger reason tag for publishing an item of the given kind.
pub fn publish_reason(kind: SupportKind) -> &'static str {
    match kind {
        SupportKind::Follow => "publish follow",
        SupportKind::Video => "publish video",
        SupportKind::Live => "publish live",
    }
}

use crate::services::notify::{NotifierHandle, NotifyAction};
use async_trait::async_trait;
use database::account::repository::AccountRepositoryTrait;
use database::support_item::repository::SupportItemRepositoryTrait;
use database::{Database, SupportItem, SupportKind};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use utils::{AppConfig, AppResult};

pub type DynCatalogService = Arc<dyn CatalogServiceTrait + Send + Sync>;

#[async_trait]
pub trait CatalogServiceTrait {
    /// Publishes a support item, debiting the configured cost for its kind.
    /// On success the community channel is notified (best-effort).
    async fn publish(
        &self,
        owner_id: i64,
        kind: SupportKind,
        link: String,
        title: Option<String>,
        description: Option<String>,
    ) -> AppResult<SupportItem>;

    async fn get_item(&self, id: ObjectId) -> AppResult<Option<SupportItem>>;

    async fn list_available(&self, kind: SupportKind, viewer_id: i64) -> AppResult<Vec<SupportItem>>;

    /// Publication cost for a kind, from configuration.
    fn cost_of(&self, kind: SupportKind) -> f64;
}

pub fn claim_button_label(kind: SupportKind) -> &'static str {
    match kind {
        SupportKind::Follow => "🟡 Ya lo seguí ✅",
        SupportKind::Video => "🟡 Ya apoyé (like/compartir) ⭐",
        SupportKind::Live => "🟡 Ya vi el live 👀",
    }
}

#[derive(Clone)]
pub struct CatalogService {
    database: Arc<Database>,
    config: Arc<AppConfig>,
    notifier: NotifierHandle,
}

impl CatalogService {
    pub fn new(database: Arc<Database>, config: Arc<AppConfig>, notifier: NotifierHandle) -> Self {
        Self {
            database,
            config,
            notifier,
        }
    }

    fn channel_announcement(&self, kind: SupportKind, publisher: &str, item: &SupportItem) -> String {
        match kind {
            SupportKind::Follow => format!(
                "📢 Nuevo seguimiento publicado por {}\n🔗 {}\n\n👉 No olvides seguir nuestro canal de noticias, cupones y promociones.",
                publisher, item.link
            ),
            SupportKind::Video => format!(
                "🎥 Nuevo video publicado por {}\n📌 {}\n📝 {}\n🔗 {}\n\n👉 No olvides seguir nuestro canal de noticias, cupones y promociones.",
                publisher,
                item.title.as_deref().unwrap_or("-"),
                item.description.as_deref().unwrap_or("-"),
                item.link
            ),
            SupportKind::Live => format!(
                "🔴 Nuevo live publicado por {}\n📌 {}\n🔗 {}\n\n👉 No olvides seguir nuestro canal de noticias, cupones y promociones.",
                publisher,
                item.title.as_deref().unwrap_or("-"),
                item.link
            ),
        }
    }
}

#[async_trait]
impl CatalogServiceTrait for CatalogService {
    async fn publish(
        &self,
        owner_id: i64,
        kind: SupportKind,
        link: String,
        title: Option<String>,
        description: Option<String>,
    ) -> AppResult<SupportItem> {
        let cost = self.cost_of(kind);
        let item = self
            .database
            .publish_item(owner_id, kind, &link, title, description, cost)
            .await?;

        // Channel announcement happens strictly after the commit.
        if let Some(channel_id) = self.config.channel_id {
            let publisher = self
                .database
                .get_account(owner_id)
                .await
                .ok()
                .flatten()
                .map(|account| account.display_name())
                .unwrap_or_else(|| owner_id.to_string());

            let text = self.channel_announcement(kind, &publisher, &item);
            // The claim button carries the (verb, entity-id) payload back in.
            let actions = match item.id {
                Some(item_id) => vec![NotifyAction::new(
                    claim_button_label(kind),
                    format!("claim_{}_{}", kind.as_str(), item_id.to_hex()),
                )],
                None => vec![],
            };
            self.notifier.notify_best_effort(channel_id, text, actions).await;
        }

        Ok(item)
    }

    async fn get_item(&self, id: ObjectId) -> AppResult<Option<SupportItem>> {
        self.database.get_item(id).await
    }

    async fn list_available(&self, kind: SupportKind, viewer_id: i64) -> AppResult<Vec<SupportItem>> {
        self.database.list_available_items(kind, viewer_id).await
    }

    fn cost_of(&self, kind: SupportKind) -> f64 {
        match kind {
            SupportKind::Follow => self.config.follow_cost,
            SupportKind::Video => self.config.video_cost,
            SupportKind::Live => self.config.live_cost,
        }
    }
}

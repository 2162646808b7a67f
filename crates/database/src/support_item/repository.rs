use crate::{
    interaction::repository::InteractionRepositoryTrait,
    ledger::repository::LedgerRepositoryTrait,
    support_item::model::{publish_reason, SupportItem, SupportKind},
    Database,
};
use async_trait::async_trait;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;
use std::sync::Arc;
use tracing::info;
use utils::{AppError, AppResult};

pub type DynSupportItemRepository = Arc<dyn SupportItemRepositoryTrait + Send + Sync>;

// 主要用于Service中，表示提供了该Trait功能
#[async_trait]
pub trait SupportItemRepositoryTrait {
    /// Publishes an item: debits `cost` from the owner and inserts the item
    /// in the same transaction. `InsufficientFunds` leaves no item behind.
    async fn publish_item(
        &self,
        owner_id: i64,
        kind: SupportKind,
        link: &str,
        title: Option<String>,
        description: Option<String>,
        cost: f64,
    ) -> AppResult<SupportItem>;

    async fn get_item(&self, id: ObjectId) -> AppResult<Option<SupportItem>>;

    /// Items of `kind` the viewer can still claim: not their own, minus the
    /// ones they already created an Interaction against. Most recent first.
    async fn list_available_items(&self, kind: SupportKind, viewer_id: i64) -> AppResult<Vec<SupportItem>>;
}

#[async_trait]
impl SupportItemRepositoryTrait for Database {
    async fn publish_item(
        &self,
        owner_id: i64,
        kind: SupportKind,
        link: &str,
        title: Option<String>,
        description: Option<String>,
        cost: f64,
    ) -> AppResult<SupportItem> {
        if link.trim().is_empty() {
            return Err(AppError::BadRequest("Item link must not be empty.".to_string()));
        }

        let mut item = SupportItem::new(owner_id, kind, link, title, description);
        let mut session = self.start_transaction().await?;

        if let Err(e) = self.debit_in_session(&mut session, owner_id, cost, publish_reason(kind)).await {
            session.abort_transaction().await.ok();
            return Err(e);
        }

        let inserted = match self.support_items.insert_one_with_session(&item, None, &mut session).await {
            Ok(result) => result,
            Err(e) => {
                session.abort_transaction().await.ok();
                return Err(e.into());
            }
        };

        self.commit_transaction(&mut session).await?;
        item.id = inserted.inserted_id.as_object_id();

        info!("📢 item published: owner={}, kind={}, cost={}", owner_id, kind, cost);
        Ok(item)
    }

    async fn get_item(&self, id: ObjectId) -> AppResult<Option<SupportItem>> {
        let item = self.support_items.find_one(doc! { "_id": id }, None).await?;

        Ok(item)
    }

    async fn list_available_items(&self, kind: SupportKind, viewer_id: i64) -> AppResult<Vec<SupportItem>> {
        // Items the viewer already claimed are never re-offered, whatever the
        // claim's current status.
        let claimed = self.claimed_item_ids(kind, viewer_id).await?;

        let filter = doc! {
            "kind": kind.as_str(),
            "owner_id": { "$ne": viewer_id },
            "_id": { "$nin": claimed },
        };
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();

        let mut cursor = self.support_items.find(filter, options).await?;

        let mut items = Vec::new();
        while let Some(doc) = cursor.next().await {
            match doc {
                Ok(item) => items.push(item),
                Err(_) => continue, // Ignore error and continue with next document
            }
        }

        Ok(items)
    }
}

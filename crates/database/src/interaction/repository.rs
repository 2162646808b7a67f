use crate::{
    interaction::model::Interaction,
    ledger::repository::LedgerRepositoryTrait,
    status::{ActingParty, ApprovalStatus, ResolveOutcome},
    support_item::model::SupportKind,
    support_item::repository::SupportItemRepositoryTrait,
    Database,
};
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::info;
use utils::{is_duplicate_key_error, AppError, AppResult};

pub type DynInteractionRepository = Arc<dyn InteractionRepositoryTrait + Send + Sync>;

pub const REASON_SUPPORT_ACCEPTED: &str = "support accepted";

/// Outcome of a favorable resolution: the transitioned row plus the referral
/// credit, when the cascade fired, so callers can notify the referrer.
#[derive(Debug, Clone)]
pub struct ResolvedInteraction {
    pub interaction: Interaction,
    pub referral_credit: Option<(i64, f64)>,
}

// 主要用于Service中，表示提供了该Trait功能
#[async_trait]
pub trait InteractionRepositoryTrait {
    /// Registers a claim. `SelfSupportNotAllowed` when the actor owns the
    /// item; `DuplicateClaim` when the (kind, item, actor) unique index
    /// already holds a row — the index, not this check, closes the race
    /// between two concurrent claims.
    async fn create_claim(
        &self,
        kind: SupportKind,
        item_id: ObjectId,
        actor_id: i64,
        points: f64,
        window_secs: i64,
    ) -> AppResult<Interaction>;

    async fn get_interaction(&self, id: ObjectId) -> AppResult<Option<Interaction>>;

    /// The single authoritative transition, shared by the manual approval
    /// path and the expiry sweep. One atomic conditional update flips
    /// `pending` to the outcome; the loser of a race observes zero matches
    /// and gets `AlreadyResolved` with the actual terminal state. Favorable
    /// outcomes credit the actor and run the referral cascade inside the
    /// same transaction.
    async fn resolve_interaction(
        &self,
        id: ObjectId,
        outcome: ResolveOutcome,
        acting_party: ActingParty,
        referral_bonus: f64,
    ) -> AppResult<ResolvedInteraction>;

    /// Pending interactions past their deadline, due for auto-acceptance.
    async fn find_expired_interactions(&self, now: i64) -> AppResult<Vec<Interaction>>;

    /// Ids of the items of `kind` that `actor_id` already claimed.
    async fn claimed_item_ids(&self, kind: SupportKind, actor_id: i64) -> AppResult<Vec<ObjectId>>;
}

#[async_trait]
impl InteractionRepositoryTrait for Database {
    async fn create_claim(
        &self,
        kind: SupportKind,
        item_id: ObjectId,
        actor_id: i64,
        points: f64,
        window_secs: i64,
    ) -> AppResult<Interaction> {
        let item = self
            .get_item(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Support item {} not found.", item_id)))?;

        if item.owner_id == actor_id {
            return Err(AppError::SelfSupportNotAllowed);
        }

        let mut claim = Interaction::new_claim(kind, item_id, actor_id, item.owner_id, points, window_secs);

        let inserted = match self.interactions.insert_one(&claim, None).await {
            Ok(result) => result,
            Err(e) if is_duplicate_key_error(&e) => {
                let filter = doc! { "kind": kind.as_str(), "item_id": item_id, "actor_id": actor_id };
                let existing = self.interactions.find_one(filter, None).await?;
                let status = existing
                    .map(|i| i.status.to_string())
                    .unwrap_or_else(|| ApprovalStatus::Pending.to_string());
                return Err(AppError::DuplicateClaim(status));
            }
            Err(e) => return Err(e.into()),
        };

        claim.id = inserted.inserted_id.as_object_id();

        info!(
            "🟡 claim created: kind={}, item={}, actor={}, owner={}, points={}",
            kind, item_id, actor_id, claim.owner_id, points
        );
        Ok(claim)
    }

    async fn get_interaction(&self, id: ObjectId) -> AppResult<Option<Interaction>> {
        let interaction = self.interactions.find_one(doc! { "_id": id }, None).await?;

        Ok(interaction)
    }

    async fn resolve_interaction(
        &self,
        id: ObjectId,
        outcome: ResolveOutcome,
        acting_party: ActingParty,
        referral_bonus: f64,
    ) -> AppResult<ResolvedInteraction> {
        let current = self
            .get_interaction(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Interaction {} not found.", id)))?;

        match (acting_party, outcome) {
            // Only the item's owner may resolve manually.
            (ActingParty::User(user_id), _) if user_id != current.owner_id => {
                return Err(AppError::NotAuthorized(
                    "no puedes resolver esta interacción".to_string(),
                ));
            }
            // Auto-acceptance is reserved for the expiry sweep.
            (ActingParty::User(_), ResolveOutcome::AutoAccepted) => {
                return Err(AppError::BadRequest(
                    "auto_accepted is reserved for the expiry sweep.".to_string(),
                ));
            }
            (ActingParty::System, ResolveOutcome::Accepted | ResolveOutcome::Rejected) => {
                return Err(AppError::BadRequest(
                    "the system only auto-accepts expired rows.".to_string(),
                ));
            }
            _ => {}
        }

        let mut session = self.start_transaction().await?;

        let filter = doc! { "_id": id, "status": ApprovalStatus::Pending.as_str() };
        let update = doc! { "$set": { "status": outcome.status().as_str() } };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let transitioned = match self
            .interactions
            .find_one_and_update_with_session(filter, update, options, &mut session)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                session.abort_transaction().await.ok();
                return Err(e.into());
            }
        };

        let interaction = match transitioned {
            Some(interaction) => interaction,
            None => {
                // Lost the race against the other resolution path; report the
                // terminal state that actually won.
                session.abort_transaction().await.ok();
                let current = self
                    .get_interaction(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Interaction {} not found.", id)))?;
                return Err(AppError::AlreadyResolved(current.status.to_string()));
            }
        };

        let mut referral_credit = None;
        if outcome.is_favorable() {
            if let Err(e) = self
                .credit_in_session(&mut session, interaction.actor_id, interaction.points, REASON_SUPPORT_ACCEPTED)
                .await
            {
                session.abort_transaction().await.ok();
                return Err(e);
            }

            match self
                .apply_referral_bonus_in_session(&mut session, interaction.actor_id, referral_bonus)
                .await
            {
                Ok(credit) => referral_credit = credit,
                Err(e) => {
                    session.abort_transaction().await.ok();
                    return Err(e);
                }
            }
        }

        self.commit_transaction(&mut session).await?;

        info!("✅ interaction resolved: id={}, status={}", id, interaction.status);
        Ok(ResolvedInteraction {
            interaction,
            referral_credit,
        })
    }

    async fn find_expired_interactions(&self, now: i64) -> AppResult<Vec<Interaction>> {
        let filter = doc! {
            "status": ApprovalStatus::Pending.as_str(),
            "expires_at": { "$lte": now },
        };

        let mut cursor = self.interactions.find(filter, None).await?;

        let mut expired = Vec::new();
        while let Some(interaction) = cursor.try_next().await? {
            expired.push(interaction);
        }

        Ok(expired)
    }

    async fn claimed_item_ids(&self, kind: SupportKind, actor_id: i64) -> AppResult<Vec<ObjectId>> {
        let filter = doc! { "kind": kind.as_str(), "actor_id": actor_id };
        let mut cursor = self.interactions.find(filter, None).await?;

        let mut item_ids = Vec::new();
        while let Some(interaction) = cursor.try_next().await? {
            item_ids.push(interaction.item_id);
        }

        Ok(item_ids)
    }
}

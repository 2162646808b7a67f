use crate::{
    admin_action::model::{AdminAction, AdminPayload},
    ledger::repository::LedgerRepositoryTrait,
    status::{ApprovalStatus, ResolveOutcome},
    Database,
};
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::ClientSession;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::info;
use utils::{is_duplicate_key_error, AppError, AppResult};

pub type DynAdminActionRepository = Arc<dyn AdminActionRepositoryTrait + Send + Sync>;

pub const REASON_ADMIN_GRANT: &str = "admin grant";
pub const REASON_ADMIN_DEDUCTION: &str = "admin deduction";

/// Outcome of a favorable resolution, mirroring `ResolvedInteraction`.
#[derive(Debug, Clone)]
pub struct ResolvedAdminAction {
    pub action: AdminAction,
    pub referral_credit: Option<(i64, f64)>,
}

// 主要用于Service中，表示提供了该Trait功能
//
// Authorization (who may propose, who may ratify) lives in the service
// layer, which owns the configuration; this repository enforces the
// state-machine and ledger invariants.
#[async_trait]
pub trait AdminActionRepositoryTrait {
    /// Inserts a proposal. With `apply_now` (proposer is the primary
    /// approver) the payload is applied and the row recorded already
    /// accepted, all in one transaction — no pending period.
    async fn propose_action(
        &self,
        proposer_id: i64,
        target_id: i64,
        payload: AdminPayload,
        apply_now: bool,
        window_secs: i64,
        referral_bonus: f64,
    ) -> AppResult<ResolvedAdminAction>;

    async fn get_action(&self, id: ObjectId) -> AppResult<Option<AdminAction>>;

    /// Same atomic conditional-update transition as the interaction
    /// workflow; the payload is applied exactly once, at the moment the row
    /// reaches accepted/auto_accepted.
    async fn resolve_action(
        &self,
        id: ObjectId,
        outcome: ResolveOutcome,
        referral_bonus: f64,
    ) -> AppResult<ResolvedAdminAction>;

    async fn find_expired_actions(&self, now: i64) -> AppResult<Vec<AdminAction>>;
}

impl Database {
    /// Applies an accepted payload inside the caller's transaction. Positive
    /// grants run the referral cascade for the target; negative grants use
    /// the guarded debit path and never drive a balance below zero.
    async fn apply_payload_in_session(
        &self,
        session: &mut ClientSession,
        target_id: i64,
        payload: &AdminPayload,
        referral_bonus: f64,
    ) -> AppResult<Option<(i64, f64)>> {
        match payload {
            AdminPayload::GrantPoints { amount } if *amount >= 0.0 => {
                self.credit_in_session(session, target_id, *amount, REASON_ADMIN_GRANT).await?;
                self.apply_referral_bonus_in_session(session, target_id, referral_bonus).await
            }
            AdminPayload::GrantPoints { amount } => {
                self.debit_in_session(session, target_id, -*amount, REASON_ADMIN_DEDUCTION).await?;
                Ok(None)
            }
            AdminPayload::ChangeAlias { alias } => {
                let filter = doc! { "telegram_id": target_id };
                let update = doc! { "$set": { "alias": alias } };

                let updated = match self.accounts.update_one_with_session(filter, update, None, session).await {
                    Ok(result) => result,
                    Err(e) if is_duplicate_key_error(&e) => {
                        return Err(AppError::Conflict(format!("Alias @{} is already taken.", alias)));
                    }
                    Err(e) => return Err(e.into()),
                };

                if updated.matched_count == 0 {
                    return Err(AppError::NotFound(format!(
                        "Account with telegram_id: {} not found.",
                        target_id
                    )));
                }

                Ok(None)
            }
        }
    }
}

#[async_trait]
impl AdminActionRepositoryTrait for Database {
    async fn propose_action(
        &self,
        proposer_id: i64,
        target_id: i64,
        payload: AdminPayload,
        apply_now: bool,
        window_secs: i64,
        referral_bonus: f64,
    ) -> AppResult<ResolvedAdminAction> {
        if !apply_now {
            let mut action = AdminAction::new_proposal(proposer_id, target_id, payload, window_secs);
            let inserted = self.admin_actions.insert_one(&action, None).await?;
            action.id = inserted.inserted_id.as_object_id();

            info!(
                "🟡 action proposed: kind={}, target={}, proposer={}",
                action.payload.kind_str(),
                target_id,
                proposer_id
            );
            return Ok(ResolvedAdminAction {
                action,
                referral_credit: None,
            });
        }

        // Proposer is the primary approver: short-circuit to accepted and
        // apply the payload in the same transaction as the insert.
        let mut action = AdminAction::new_applied(proposer_id, target_id, payload);
        let mut session = self.start_transaction().await?;

        let referral_credit = match self
            .apply_payload_in_session(&mut session, target_id, &action.payload, referral_bonus)
            .await
        {
            Ok(credit) => credit,
            Err(e) => {
                session.abort_transaction().await.ok();
                return Err(e);
            }
        };

        let inserted = match self.admin_actions.insert_one_with_session(&action, None, &mut session).await {
            Ok(result) => result,
            Err(e) => {
                session.abort_transaction().await.ok();
                return Err(e.into());
            }
        };

        self.commit_transaction(&mut session).await?;
        action.id = inserted.inserted_id.as_object_id();

        info!(
            "✅ action applied inline: kind={}, target={}, approver={}",
            action.payload.kind_str(),
            target_id,
            proposer_id
        );
        Ok(ResolvedAdminAction {
            action,
            referral_credit,
        })
    }

    async fn get_action(&self, id: ObjectId) -> AppResult<Option<AdminAction>> {
        let action = self.admin_actions.find_one(doc! { "_id": id }, None).await?;

        Ok(action)
    }

    async fn resolve_action(
        &self,
        id: ObjectId,
        outcome: ResolveOutcome,
        referral_bonus: f64,
    ) -> AppResult<ResolvedAdminAction> {
        let mut session = self.start_transaction().await?;

        let filter = doc! { "_id": id, "status": ApprovalStatus::Pending.as_str() };
        let update = doc! { "$set": { "status": outcome.status().as_str() } };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let transitioned = match self
            .admin_actions
            .find_one_and_update_with_session(filter, update, options, &mut session)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                session.abort_transaction().await.ok();
                return Err(e.into());
            }
        };

        let action = match transitioned {
            Some(action) => action,
            None => {
                session.abort_transaction().await.ok();
                let current = self
                    .get_action(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Admin action {} not found.", id)))?;
                return Err(AppError::AlreadyResolved(current.status.to_string()));
            }
        };

        let mut referral_credit = None;
        if outcome.is_favorable() {
            match self
                .apply_payload_in_session(&mut session, action.target_id, &action.payload, referral_bonus)
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

        info!("✅ action resolved: id={}, status={}", id, action.status);
        Ok(ResolvedAdminAction {
            action,
            referral_credit,
        })
    }

    async fn find_expired_actions(&self, now: i64) -> AppResult<Vec<AdminAction>> {
        let filter = doc! {
            "status": ApprovalStatus::Pending.as_str(),
            "expires_at": { "$lte": now },
        };

        let mut cursor = self.admin_actions.find(filter, None).await?;

        let mut expired = Vec::new();
        while let Some(action) = cursor.try_next().await? {
            expired.push(action);
        }

        Ok(expired)
    }
}

use crate::services::notify::{NotifierHandle, NotifyAction};
use async_trait::async_trait;
use chrono::Utc;
use database::account::repository::AccountRepositoryTrait;
use database::admin_action::repository::AdminActionRepositoryTrait;
use database::{ActingParty, AdminAction, AdminPayload, ApprovalStatus, Database, ResolveOutcome};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{error, info, warn};
use utils::{AppConfig, AppError, AppResult};

pub type DynAdminService = Arc<dyn AdminServiceTrait + Send + Sync>;

#[async_trait]
pub trait AdminServiceTrait {
    /// Proposes a privileged mutation. Proposals by the primary approver are
    /// applied inline (no pending period); moderator proposals go pending and
    /// the primary approver is asked to ratify.
    async fn propose(&self, proposer_id: i64, target_id: i64, payload: AdminPayload) -> AppResult<AdminAction>;

    /// Ratifies or rejects a pending action. Only the primary approver may
    /// resolve manually; the expiry sweep auto-accepts as `System`.
    async fn resolve(
        &self,
        id: ObjectId,
        outcome: ResolveOutcome,
        acting_party: ActingParty,
    ) -> AppResult<AdminAction>;

    /// One expiry-sweep pass over pending admin actions.
    async fn sweep_expired(&self) -> AppResult<usize>;
}

#[derive(Clone)]
pub struct AdminService {
    database: Arc<Database>,
    config: Arc<AppConfig>,
    notifier: NotifierHandle,
}

impl AdminService {
    pub fn new(database: Arc<Database>, config: Arc<AppConfig>, notifier: NotifierHandle) -> Self {
        Self {
            database,
            config,
            notifier,
        }
    }

    fn is_primary_approver(&self, telegram_id: i64) -> bool {
        telegram_id == self.config.admin_id
    }

    fn is_moderator(&self, telegram_id: i64) -> bool {
        self.config.moderator_ids().contains(&telegram_id)
    }

    pub(crate) fn target_text(action: &AdminAction) -> Option<String> {
        match (&action.payload, action.status) {
            (AdminPayload::GrantPoints { amount }, ApprovalStatus::Accepted | ApprovalStatus::AutoAccepted)
                if *amount >= 0.0 =>
            {
                Some(format!("🎁 Has recibido {} puntos de administrador.", amount))
            }
            (AdminPayload::GrantPoints { amount }, ApprovalStatus::Accepted | ApprovalStatus::AutoAccepted) => {
                Some(format!("📉 Un administrador descontó {} puntos de tu cuenta.", -amount))
            }
            (AdminPayload::ChangeAlias { alias }, ApprovalStatus::Accepted | ApprovalStatus::AutoAccepted) => {
                Some(format!("✏️ Un administrador cambió tu alias a @{}.", alias))
            }
            _ => None,
        }
    }

    async fn notify_applied(&self, action: &AdminAction, referral_credit: Option<(i64, f64)>) {
        if let Some(text) = Self::target_text(action) {
            self.notifier.notify_best_effort(action.target_id, text, vec![]).await;
        }

        if let Some((referrer_id, bonus)) = referral_credit {
            let text = format!(
                "🎉 Bono de referido: ganaste {} puntos por un premio otorgado a tu referido.",
                bonus
            );
            self.notifier.notify_best_effort(referrer_id, text, vec![]).await;
        }
    }
}

#[async_trait]
impl AdminServiceTrait for AdminService {
    async fn propose(&self, proposer_id: i64, target_id: i64, payload: AdminPayload) -> AppResult<AdminAction> {
        if !self.is_primary_approver(proposer_id) && !self.is_moderator(proposer_id) {
            return Err(AppError::NotAuthorized(
                "no tienes permiso para proponer acciones administrativas".to_string(),
            ));
        }

        // The target must exist before anything is proposed against it.
        self.database.expect_account(target_id).await?;

        let apply_now = self.is_primary_approver(proposer_id);
        let window = self.config.approval_window_secs() as i64;

        let resolved = self
            .database
            .propose_action(
                proposer_id,
                target_id,
                payload,
                apply_now,
                window,
                self.config.referral_bonus,
            )
            .await?;

        if apply_now {
            self.notify_applied(&resolved.action, resolved.referral_credit).await;
            return Ok(resolved.action);
        }

        // Moderator proposal: ask the primary approver to ratify.
        if let Some(action_id) = resolved.action.id {
            let proposer = self
                .database
                .get_account(proposer_id)
                .await
                .ok()
                .flatten()
                .map(|account| account.display_name())
                .unwrap_or_else(|| proposer_id.to_string());

            let text = format!(
                "🛡️ Propuesta de {}: {} para la cuenta {}.\nID: {}\n¿La apruebas?",
                proposer,
                resolved.action.payload.describe(),
                target_id,
                action_id
            );
            let actions = vec![
                NotifyAction::new("✅ Aprobar", format!("approve_action_{}", action_id.to_hex())),
                NotifyAction::new("❌ Rechazar", format!("reject_action_{}", action_id.to_hex())),
            ];
            self.notifier.notify_best_effort(self.config.admin_id, text, actions).await;
        }

        Ok(resolved.action)
    }

    async fn resolve(
        &self,
        id: ObjectId,
        outcome: ResolveOutcome,
        acting_party: ActingParty,
    ) -> AppResult<AdminAction> {
        match (acting_party, outcome) {
            (ActingParty::User(user_id), _) if !self.is_primary_approver(user_id) => {
                return Err(AppError::NotAuthorized(
                    "solo el administrador principal puede resolver esta acción".to_string(),
                ));
            }
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

        let resolved = self
            .database
            .resolve_action(id, outcome, self.config.referral_bonus)
            .await?;

        let action = resolved.action;

        // Outcome report to the proposer, payload effect to the target.
        let proposer_text = match action.status {
            ApprovalStatus::Accepted => format!("✅ Tu propuesta ({}) fue aprobada.", action.payload.describe()),
            ApprovalStatus::AutoAccepted => format!(
                "✅ Tu propuesta ({}) fue aprobada automáticamente.",
                action.payload.describe()
            ),
            ApprovalStatus::Rejected => format!("❌ Tu propuesta ({}) fue rechazada.", action.payload.describe()),
            ApprovalStatus::Pending => String::new(),
        };
        if !proposer_text.is_empty() && action.proposer_id != self.config.admin_id {
            self.notifier.notify_best_effort(action.proposer_id, proposer_text, vec![]).await;
        }

        self.notify_applied(&action, resolved.referral_credit).await;

        Ok(action)
    }

    async fn sweep_expired(&self) -> AppResult<usize> {
        let now = Utc::now().timestamp();
        let expired = self.database.find_expired_actions(now).await?;

        let mut resolved = 0usize;
        for action in expired {
            let Some(id) = action.id else { continue };

            match self.resolve(id, ResolveOutcome::AutoAccepted, ActingParty::System).await {
                Ok(_) => resolved += 1,
                Err(AppError::AlreadyResolved(status)) => {
                    warn!("⏰ admin action {} resolved concurrently as {}", id, status);
                }
                Err(e) => {
                    error!("❌ failed to auto-accept admin action {}: {}", id, e);
                }
            }
        }

        if resolved > 0 {
            info!("⏰ auto-accepted {} expired admin action(s)", resolved);
        }
        Ok(resolved)
    }
}

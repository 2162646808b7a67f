use crate::services::notify::{NotifierHandle, NotifyAction};
use async_trait::async_trait;
use chrono::Utc;
use database::account::repository::AccountRepositoryTrait;
use database::interaction::repository::InteractionRepositoryTrait;
use database::{ActingParty, ApprovalStatus, Database, Interaction, ResolveOutcome, SupportKind};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{error, info, warn};
use utils::{AppConfig, AppError, AppResult};

pub type DynInteractionService = Arc<dyn InteractionServiceTrait + Send + Sync>;

#[async_trait]
pub trait InteractionServiceTrait {
    /// Registers a claim and notifies the owner with accept/reject buttons.
    async fn claim(&self, actor_id: i64, kind: SupportKind, item_id: ObjectId) -> AppResult<Interaction>;

    /// Resolves a pending claim (manual path and expiry sweep) and notifies
    /// the actor — and the referrer, when the cascade fired — of the outcome.
    async fn resolve(
        &self,
        id: ObjectId,
        outcome: ResolveOutcome,
        acting_party: ActingParty,
    ) -> AppResult<Interaction>;

    /// One expiry-sweep pass: auto-accepts every pending claim past its
    /// deadline. Returns how many rows this pass resolved.
    async fn sweep_expired(&self) -> AppResult<usize>;

    /// Points credited for fulfilling a kind, from configuration.
    fn points_of(&self, kind: SupportKind) -> f64;
}

#[derive(Clone)]
pub struct InteractionService {
    database: Arc<Database>,
    config: Arc<AppConfig>,
    notifier: NotifierHandle,
}

impl InteractionService {
    pub fn new(database: Arc<Database>, config: Arc<AppConfig>, notifier: NotifierHandle) -> Self {
        Self {
            database,
            config,
            notifier,
        }
    }

    async fn display_name(&self, telegram_id: i64) -> String {
        self.database
            .get_account(telegram_id)
            .await
            .ok()
            .flatten()
            .map(|account| account.display_name())
            .unwrap_or_else(|| telegram_id.to_string())
    }

    pub(crate) fn claim_request_text(kind: SupportKind, actor: &str, id: &ObjectId, points: f64) -> String {
        let action = match kind {
            SupportKind::Follow => format!("📈 Solicitud: {} indica que ya siguió tu perfil.", actor),
            SupportKind::Video => format!("🎥 Solicitud: {} apoyó tu video.", actor),
            SupportKind::Live => format!("🔴 Solicitud: {} estuvo en tu live.", actor),
        };
        format!("{}\nID: {}\n¿Aceptas otorgar {} puntos?", action, id, points)
    }

    pub(crate) fn outcome_text(interaction: &Interaction) -> String {
        match interaction.status {
            ApprovalStatus::Accepted => format!(
                "✅ Tu apoyo en {} fue aprobado. Ganaste {} puntos.",
                interaction.kind.noun(),
                interaction.points
            ),
            ApprovalStatus::AutoAccepted => format!(
                "✅ Tu apoyo en {} fue aprobado automáticamente (el dueño no respondió). Ganaste {} puntos.",
                interaction.kind.noun(),
                interaction.points
            ),
            ApprovalStatus::Rejected => {
                format!("❌ Tu apoyo en {} fue rechazado.", interaction.kind.noun())
            }
            // resolve() never leaves a row pending.
            ApprovalStatus::Pending => String::new(),
        }
    }
}

#[async_trait]
impl InteractionServiceTrait for InteractionService {
    async fn claim(&self, actor_id: i64, kind: SupportKind, item_id: ObjectId) -> AppResult<Interaction> {
        let points = self.points_of(kind);
        let window = self.config.approval_window_secs() as i64;

        let claim = self.database.create_claim(kind, item_id, actor_id, points, window).await?;

        // The owner learns about the claim only after it committed.
        if let Some(claim_id) = claim.id {
            let actor = self.display_name(actor_id).await;
            let text = Self::claim_request_text(kind, &actor, &claim_id, points);
            let actions = vec![
                NotifyAction::new("✅ Aceptar", format!("approve_interaction_{}", claim_id.to_hex())),
                NotifyAction::new("❌ Rechazar", format!("reject_interaction_{}", claim_id.to_hex())),
            ];
            self.notifier.notify_best_effort(claim.owner_id, text, actions).await;
        }

        Ok(claim)
    }

    async fn resolve(
        &self,
        id: ObjectId,
        outcome: ResolveOutcome,
        acting_party: ActingParty,
    ) -> AppResult<Interaction> {
        let resolved = self
            .database
            .resolve_interaction(id, outcome, acting_party, self.config.referral_bonus)
            .await?;

        let interaction = resolved.interaction;
        self.notifier
            .notify_best_effort(interaction.actor_id, Self::outcome_text(&interaction), vec![])
            .await;

        if let Some((referrer_id, bonus)) = resolved.referral_credit {
            let actor = self.display_name(interaction.actor_id).await;
            let text = format!(
                "🎉 Bono de referido: ganaste {} puntos porque {} recibió apoyo.",
                bonus, actor
            );
            self.notifier.notify_best_effort(referrer_id, text, vec![]).await;
        }

        Ok(interaction)
    }

    async fn sweep_expired(&self) -> AppResult<usize> {
        let now = Utc::now().timestamp();
        let expired = self.database.find_expired_interactions(now).await?;

        let mut resolved = 0usize;
        for interaction in expired {
            let Some(id) = interaction.id else { continue };

            match self.resolve(id, ResolveOutcome::AutoAccepted, ActingParty::System).await {
                Ok(_) => resolved += 1,
                // A manual approval won the race while this pass ran.
                Err(AppError::AlreadyResolved(status)) => {
                    warn!("⏰ interaction {} resolved concurrently as {}", id, status);
                }
                Err(e) => {
                    error!("❌ failed to auto-accept interaction {}: {}", id, e);
                }
            }
        }

        if resolved > 0 {
            info!("⏰ auto-accepted {} expired interaction(s)", resolved);
        }
        Ok(resolved)
    }

    fn points_of(&self, kind: SupportKind) -> f64 {
        match kind {
            SupportKind::Follow => self.config.follow_points,
            SupportKind::Video => self.config.video_points,
            SupportKind::Live => self.config.live_points,
        }
    }
}

use crate::{command::Command, utils::parse_callback, HandlerResult};
use ::utils::AppError;
use chrono::DateTime;
use database::{ActingParty, AdminPayload, ApprovalStatus, ResolveOutcome, SupportKind};
use mongodb::bson::oid::ObjectId;
use server::services::Services;
use teloxide::{prelude::*, types::ChatId};
use tracing::error;

pub async fn handle_command(bot: Bot, services: Services, msg: Message, cmd: Command) -> HandlerResult {
    let Some(user) = msg.from.clone() else {
        return Ok(());
    };
    let telegram_id = user.id.0 as i64;

    match cmd {
        Command::Start(token) => {
            let token = token.trim();
            let token = (!token.is_empty()).then(|| token.to_string());

            match services.account.register(telegram_id, token).await {
                Ok((account, _created)) => {
                    bot.send_message(
                        msg.chat.id,
                        format!(
                            "👋 Hola {}, bienvenido.\nTu balance actual es: {}",
                            user.first_name, account.balance
                        ),
                    )
                    .await?;
                    bot.send_message(
                        msg.chat.id,
                        format!(
                            "🎟️ Tu código de referido: {}\nCompártelo para ganar bonos cuando tus invitados reciban apoyo.\n\n✏️ Registra tu usuario de TikTok con /alias <usuario>.",
                            account.referral_token
                        ),
                    )
                    .await?;
                }
                Err(e) => {
                    bot.send_message(msg.chat.id, domain_reply(e)).await?;
                }
            }
        }

        Command::Balance => match balance_text(&services, telegram_id).await {
            Ok(text) => {
                bot.send_message(msg.chat.id, text).await?;
            }
            Err(AppError::NotFound(_)) => {
                bot.send_message(msg.chat.id, "❌ No estás registrado. Usa /start primero.").await?;
            }
            Err(e) => {
                bot.send_message(msg.chat.id, domain_reply(e)).await?;
            }
        },

        Command::Alias(alias) => {
            let alias = alias.trim().trim_start_matches('@').to_string();
            if alias.is_empty() {
                bot.send_message(msg.chat.id, "⚠️ Envía un usuario válido.").await?;
                return Ok(());
            }

            match services.account.set_alias(telegram_id, alias.clone()).await {
                Ok(()) => {
                    bot.send_message(msg.chat.id, format!("✅ Usuario TikTok registrado: {}", alias))
                        .await?;
                }
                Err(AppError::NotFound(_)) => {
                    bot.send_message(msg.chat.id, "❌ No estás registrado. Usa /start primero.").await?;
                }
                Err(e) => {
                    bot.send_message(msg.chat.id, domain_reply(e)).await?;
                }
            }
        }

        Command::DarPuntos { target, amount } => {
            match services
                .admin
                .propose(telegram_id, target, AdminPayload::GrantPoints { amount })
                .await
            {
                Ok(action) if action.status == ApprovalStatus::Accepted => {
                    bot.send_message(
                        msg.chat.id,
                        format!("✅ Se otorgaron {} puntos al usuario {}.", amount, target),
                    )
                    .await?;
                }
                Ok(_) => {
                    bot.send_message(
                        msg.chat.id,
                        "🟡 Propuesta registrada, se notificó al administrador para aprobación.",
                    )
                    .await?;
                }
                Err(AppError::NotAuthorized(_)) => {
                    bot.send_message(msg.chat.id, "❌ No tienes permiso para usar este comando.").await?;
                }
                Err(e) => {
                    bot.send_message(msg.chat.id, domain_reply(e)).await?;
                }
            }
        }
    }

    Ok(())
}

pub async fn handle_callback(bot: Bot, services: Services, q: CallbackQuery) -> HandlerResult {
    // Best effort, like every other delivery to the gateway.
    bot.answer_callback_query(q.id.clone()).await.ok();

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let user_id = q.from.id.0 as i64;
    let chat_id = q.message.as_ref().map(|m| m.chat().id).unwrap_or(ChatId(user_id));

    let Some((verb, entity_id)) = parse_callback(data) else {
        return Ok(());
    };
    let Ok(id) = ObjectId::parse_str(entity_id) else {
        bot.send_message(chat_id, "❌ Referencia inválida.").await?;
        return Ok(());
    };

    let reply = match verb {
        "claim_follow" => claim_reply(&services, user_id, SupportKind::Follow, id).await,
        "claim_video" => claim_reply(&services, user_id, SupportKind::Video, id).await,
        "claim_live" => claim_reply(&services, user_id, SupportKind::Live, id).await,
        "approve_interaction" => resolve_interaction_reply(&services, user_id, id, ResolveOutcome::Accepted).await,
        "reject_interaction" => resolve_interaction_reply(&services, user_id, id, ResolveOutcome::Rejected).await,
        "approve_action" => resolve_action_reply(&services, user_id, id, ResolveOutcome::Accepted).await,
        "reject_action" => resolve_action_reply(&services, user_id, id, ResolveOutcome::Rejected).await,
        _ => return Ok(()),
    };

    bot.send_message(chat_id, reply).await?;
    Ok(())
}

async fn claim_reply(services: &Services, actor_id: i64, kind: SupportKind, item_id: ObjectId) -> String {
    // Claims from the channel can come from users who never did /start.
    match services.account.get_account(actor_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return "❌ No estás registrado. Usa /start primero.".to_string(),
        Err(e) => return domain_reply(e),
    }

    match services.interaction.claim(actor_id, kind, item_id).await {
        Ok(_) => "🟡 Listo, se notificó al dueño para aprobación.".to_string(),
        Err(e) => domain_reply(e),
    }
}

async fn resolve_interaction_reply(
    services: &Services,
    user_id: i64,
    id: ObjectId,
    outcome: ResolveOutcome,
) -> String {
    match services.interaction.resolve(id, outcome, ActingParty::User(user_id)).await {
        Ok(interaction) if interaction.status == ApprovalStatus::Accepted => {
            "✅ Interacción aprobada. Puntos otorgados.".to_string()
        }
        Ok(_) => "❌ Interacción rechazada.".to_string(),
        Err(AppError::AlreadyResolved(status)) => {
            format!("⚠️ Esta interacción ya está en estado: {}.", status)
        }
        Err(e) => domain_reply(e),
    }
}

async fn resolve_action_reply(services: &Services, user_id: i64, id: ObjectId, outcome: ResolveOutcome) -> String {
    match services.admin.resolve(id, outcome, ActingParty::User(user_id)).await {
        Ok(action) if action.status == ApprovalStatus::Accepted => "✅ Acción aprobada y aplicada.".to_string(),
        Ok(_) => "❌ Acción rechazada.".to_string(),
        Err(AppError::AlreadyResolved(status)) => format!("⚠️ Esta acción ya está en estado: {}.", status),
        Err(e) => domain_reply(e),
    }
}

async fn balance_text(services: &Services, telegram_id: i64) -> ::utils::AppResult<String> {
    let balance = services.ledger.balance_of(telegram_id).await?;
    let entries = services.ledger.history(telegram_id, 10).await?;

    let mut text = format!("💰 Tu balance actual: {} puntos\n\n📜 Últimos movimientos:\n", balance);
    if entries.is_empty() {
        text.push_str("⚠️ No tienes historial todavía.");
    } else {
        for entry in entries {
            let when = DateTime::from_timestamp(entry.created_at, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            text.push_str(&format!("- {}: {} puntos ({})\n", entry.reason, entry.amount, when));
        }
    }

    Ok(text)
}

/// The five recoverable conditions surface as plain messages; anything else
/// is logged and hidden behind a generic apology.
fn domain_reply(e: AppError) -> String {
    if e.is_domain_error() {
        format!("⚠️ {}", e)
    } else {
        error!("❌ handler error: {}", e);
        "❌ Ocurrió un error, intenta de nuevo.".to_string()
    }
}

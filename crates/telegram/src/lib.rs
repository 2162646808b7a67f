// Telegram: 向用户提供数据查询，消息通知，审批按钮等功能

mod command;
mod handler;
mod keyboard;
mod utils;

use ::utils::{AppError, AppResult};
use async_trait::async_trait;
use command::Command;
use server::services::notify::{Notifier, NotifyAction};
use server::services::Services;
use std::sync::Arc;
use teloxide::{prelude::*, types::ChatId};
use tracing::info;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone)]
pub struct ApoyoBot {
    pub services: Services,
    pub bot: Arc<Bot>,
}

impl ApoyoBot {
    pub fn new(token: String, services: Services) -> Self {
        Self {
            services,
            bot: Arc::new(Bot::new(token)),
        }
    }

    pub async fn run(&self) {
        let schema_tree = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(handler::handle_command),
            )
            .branch(Update::filter_callback_query().endpoint(handler::handle_callback));

        info!("🤖 ApoyoBot running ...");

        Dispatcher::builder((*self.bot).clone(), schema_tree)
            .dependencies(dptree::deps![self.services.clone()])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[async_trait]
impl Notifier for ApoyoBot {
    async fn notify(&self, chat_id: i64, text: &str, actions: &[NotifyAction]) -> AppResult<()> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if !actions.is_empty() {
            request = request.reply_markup(keyboard::to_inline_keyboard(actions));
        }

        request
            .await
            .map_err(|e| AppError::InternalServerErrorWithContext(format!("telegram send failed: {}", e)))?;

        Ok(())
    }
}

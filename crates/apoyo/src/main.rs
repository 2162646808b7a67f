use anyhow::Result;
use clap::Parser;
use database::Database;
use server::{app::ApplicationServer, services::Services};
use std::sync::Arc;
use telegram::ApoyoBot;
use timer::Timer;
use tokio::{signal, sync::Notify, task::JoinSet};
use tracing::info;
use utils::{AppConfig, Logger};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // 根据 CARGO_ENV 加载对应的环境配置文件
    utils::EnvLoader::load_env_file().ok();

    let apoyo = Apoyo::new().await?;
    apoyo.run().await.expect("Apoyo backend error");

    Ok(())
}

pub struct Apoyo {
    services: Services,
    timer: Timer,
    telegram: Option<ApoyoBot>,
    config: Arc<AppConfig>,
}

impl Apoyo {
    pub async fn new() -> Result<Self> {
        let config = Arc::new(AppConfig::parse());
        let _guard = Box::leak(Box::new(Logger::new(config.cargo_env)));

        let db = Database::new(config.clone()).await?;
        db.init_indexes().await?;

        let services = Services::new(db, config.clone());

        let telegram = match &config.bot_token {
            Some(token) => {
                let bot = ApoyoBot::new(token.clone(), services.clone());
                // From here on every post-commit notification goes out through
                // the gateway.
                services.set_notifier(Arc::new(bot.clone())).await;
                Some(bot)
            }
            None => {
                info!("🤖 BOT_TOKEN not set, running headless (no notifications).");
                None
            }
        };

        let timer = Timer::new(Some(config.sweep_schedule.clone()), services.clone());

        Ok(Self {
            services,
            timer,
            telegram,
            config,
        })
    }

    pub async fn run(self) -> Result<JoinSet<()>, Box<dyn std::error::Error>> {
        let shutdown_notify = Arc::new(Notify::new());
        let mut set = JoinSet::new();

        // 1. 启动api & services
        // 2. 启动telegram
        // 3. 启动Timer(过期pending行的自动批准)

        if let Some(bot) = self.telegram {
            set.spawn(async move {
                bot.run().await;
            });
        }

        let timer = Arc::new(self.timer);
        set.spawn(async move {
            timer.run().await;
        });

        let config = self.config.clone();
        let services = self.services.clone();
        set.spawn(async move {
            ApplicationServer::serve(config, services)
                .await
                .expect("🔴 Failed to start server");
        });

        tokio::select! {
            _ = async {
                while let Some(_) = set.join_next().await {
                    info!("🔔 Task completed");
                }
            } => {},
            _ = signal::ctrl_c() => {
                info!("❌ Ctrl+C received, shutting down...");
                shutdown_notify.notify_waiters();
                set.shutdown().await;
            },
        }

        Ok(set)
    }
}

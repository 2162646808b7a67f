// Timer: 定时执行
// - 将过期未响应的pending行(Interaction/AdminAction)自动批准(auto_accepted)
use chrono::Utc;
use cron::Schedule;
use server::services::Services;
use std::{str::FromStr, sync::Arc, time::Duration};
use tokio::{task, time::sleep_until};
use tracing::{error, info};

/// Expiry resolver: each tick force-resolves every pending row past its
/// deadline through the same atomic transition the manual path uses, so
/// racing a manual approval can only ever produce one credit.
#[derive(Clone)]
pub struct Timer {
    pub schedule: String,
    pub services: Services,
}

impl Timer {
    // "0 * * * * *": cada minuto, en el segundo 0
    pub fn new(schedule: Option<String>, services: Services) -> Self {
        match schedule {
            Some(schedule) => Timer { schedule, services },
            None => Timer {
                schedule: "0 * * * * *".to_string(),
                services,
            },
        }
    }

    pub async fn run(self: Arc<Self>) {
        info!("⏳ Timer sweeping expired approvals on schedule `{}`.", self.schedule);

        let schedule = Schedule::from_str(&self.schedule).expect("🔴 Invalid sweep schedule");

        loop {
            let now = Utc::now();
            let next_run_time = match schedule.upcoming(Utc).next() {
                Some(next) => next,
                None => {
                    error!("🔴 Sweep schedule yields no upcoming run, timer stopped.");
                    return;
                }
            };

            let duration_until_next_run = (next_run_time - now).to_std().unwrap_or(Duration::from_secs(0));

            sleep_until(tokio::time::Instant::now() + duration_until_next_run).await;

            let this = Arc::clone(&self);
            let tick = task::spawn(async move {
                this.sweep_expired().await;
            })
            .await;

            if let Err(e) = tick {
                error!("🔴 Sweep task panicked: {}", e);
            }
        }
    }

    /// One pass over both workflows. Row failures are logged inside the
    /// services; a storage failure here skips the pass, never kills the loop.
    async fn sweep_expired(&self) {
        if let Err(e) = self.services.interaction.sweep_expired().await {
            error!("❌ interaction sweep failed: {}", e);
        }

        if let Err(e) = self.services.admin.sweep_expired().await {
            error!("❌ admin action sweep failed: {}", e);
        }
    }
}

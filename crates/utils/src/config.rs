use clap::Parser;

#[derive(clap::ValueEnum, Clone, Debug, Copy)]
#[clap(rename_all = "lowercase")]
pub enum CargoEnv {
    Development,
    Production,
}

/// 环境配置加载器
pub struct EnvLoader;

impl EnvLoader {
    /// 根据 CARGO_ENV 加载对应的环境配置文件
    pub fn load_env_file() -> Result<(), Box<dyn std::error::Error>> {
        // 1. 获取环境变量 CARGO_ENV development
        let cargo_env = std::env::var("CARGO_ENV").unwrap_or_else(|_| "development".to_string());
        println!("cargo_env: {}", cargo_env);
        // 2. 构建配置文件路径
        let env_file = match cargo_env.as_str() {
            "production" | "Production" | "prod" => ".env.production",
            "development" | "Development" | "dev" => ".env.development",
            "test" | "Test" => ".env.test",
            _ => {
                println!("⚠️  未知的 CARGO_ENV: {}，使用默认的 .env.development", cargo_env);
                ".env.development"
            }
        };
        println!("env_file: {}", env_file);
        // 3. 检查文件是否存在
        if !std::path::Path::new(env_file).exists() {
            eprintln!("⚠️  配置文件 {} 不存在，尝试加载默认的 .env 文件", env_file);
            // 回退到默认的 .env 文件
            if std::path::Path::new(".env").exists() {
                dotenvy::from_filename(".env")?;
                println!("✅ 已加载默认配置文件: .env");
            } else {
                eprintln!("❌ 未找到任何配置文件，使用默认配置");
            }
            return Ok(());
        }

        // 4. 加载指定的环境配置文件
        dotenvy::from_filename(env_file)?;
        println!("✅ 已加载环境配置文件: {} (CARGO_ENV={})", env_file, cargo_env);

        Ok(())
    }
}

#[derive(clap::Parser, Clone, Debug)]
pub struct AppConfig {
    #[clap(long, env, value_enum)]
    pub cargo_env: CargoEnv,

    #[clap(long, env, default_value = "0.0.0.0")]
    pub app_host: String,

    #[clap(long, env, default_value = "8000")]
    pub app_port: u16,

    #[clap(long, env, default_value = "mongodb://localhost:27017")]
    pub mongo_uri: String,

    #[clap(long, env)]
    pub mongo_db: String,

    /// Telegram bot token; the bot is skipped when unset
    #[clap(long, env)]
    pub bot_token: Option<String>,

    /// Canal de publicación de nuevos items
    #[clap(long, env)]
    pub channel_id: Option<i64>,

    /// Primary approver of admin actions
    #[clap(long, env, default_value = "890166032")]
    pub admin_id: i64,

    /// Delegated moderators allowed to propose admin actions (comma separated)
    #[clap(long, env, default_value = "")]
    pub moderators: String,

    /// Balance granted on first contact
    #[clap(long, env, default_value = "10.0")]
    pub signup_grant: f64,

    #[clap(long, env, default_value = "3.0")]
    pub follow_cost: f64,

    #[clap(long, env, default_value = "5.0")]
    pub video_cost: f64,

    #[clap(long, env, default_value = "4.0")]
    pub live_cost: f64,

    /// Puntos otorgados al aprobar un apoyo de seguimiento
    #[clap(long, env, default_value = "2.0")]
    pub follow_points: f64,

    #[clap(long, env, default_value = "3.0")]
    pub video_points: f64,

    #[clap(long, env, default_value = "3.0")]
    pub live_points: f64,

    #[clap(long, env, default_value = "1.0")]
    pub referral_bonus: f64,

    /// Pending interactions/actions auto-accept after this window
    #[clap(long, env, default_value = "48")]
    pub approval_window_hours: i64,

    /// Expiry sweep schedule (cron, seconds field included)
    #[clap(long, env, default_value = "0 * * * * *")]
    pub sweep_schedule: String,

    #[clap(long, env, default_value = "info")]
    pub rust_log: String,
}

impl AppConfig {
    /// Moderator ids parsed from the comma separated `MODERATORS` value.
    pub fn moderator_ids(&self) -> Vec<i64> {
        self.moderators
            .split(',')
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .collect()
    }

    pub fn approval_window_secs(&self) -> u64 {
        (self.approval_window_hours.max(0) as u64) * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig::parse_from(["apoyo", "--cargo-env", "development", "--mongo-db", "apoyo_test"])
    }

    #[test]
    fn test_default_point_economy() {
        let config = test_config();

        assert_eq!(config.signup_grant, 10.0);
        assert_eq!(config.follow_cost, 3.0);
        assert_eq!(config.video_cost, 5.0);
        assert_eq!(config.live_cost, 4.0);
        assert_eq!(config.follow_points, 2.0);
        assert_eq!(config.video_points, 3.0);
        assert_eq!(config.live_points, 3.0);
        assert_eq!(config.referral_bonus, 1.0);

        println!("✅ 测试通过: default_point_economy");
    }

    #[test]
    fn test_default_approval_window() {
        let config = test_config();

        assert_eq!(config.approval_window_hours, 48);
        assert_eq!(config.approval_window_secs(), 48 * 3600);
        assert_eq!(config.sweep_schedule, "0 * * * * *");
    }

    #[test]
    fn test_moderator_ids_parsing() {
        let mut config = test_config();
        assert!(config.moderator_ids().is_empty());

        config.moderators = "123, 456,abc, 789".to_string();
        assert_eq!(config.moderator_ids(), vec![123, 456, 789]);
    }
}

use anyhow::Result;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        let scheduler = SchedulerConfig {
            hold_ttl_seconds: std::env::var("SLOT_HOLD_TTL_SECONDS")
                .ok()
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or(SchedulerConfig::DEFAULT_HOLD_TTL_SECONDS),
            max_window_days: std::env::var("SLOT_QUERY_MAX_WINDOW_DAYS")
                .ok()
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or(SchedulerConfig::DEFAULT_MAX_WINDOW_DAYS),
        };
        Ok(Self {
            database,
            scheduler,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

/// 空き枠生成まわりの調整値
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// ホールドした枠の有効秒数。ユーザーが予約フローを終えるまでの猶予。
    pub hold_ttl_seconds: i64,
    /// 一度に照会できる期間の上限（日数）
    pub max_window_days: i64,
}

impl SchedulerConfig {
    pub const DEFAULT_HOLD_TTL_SECONDS: i64 = 120;
    pub const DEFAULT_MAX_WINDOW_DAYS: i64 = 31;

    pub fn hold_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.hold_ttl_seconds)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            hold_ttl_seconds: Self::DEFAULT_HOLD_TTL_SECONDS,
            max_window_days: Self::DEFAULT_MAX_WINDOW_DAYS,
        }
    }
}

use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use tradeboard_core::constants::{DEFAULT_BACKFILL_CONCURRENCY, DEFAULT_LEADERBOARD_WINDOW_DAYS};
use tradeboard_core::quotes::CoveragePolicy;
use tradeboard_market_data::YAHOO_BASE_URL;

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub market_data_url: String,
    pub market_data_timeout: Duration,
    pub backfill_concurrency: usize,
    pub leaderboard_window_days: i64,
    pub coverage_policy: CoveragePolicy,
    /// `None` disables the snapshot scheduler
    pub snapshot_interval: Option<Duration>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}='{}': {}", key, raw, e)),
        _ => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = env_or("TB_LISTEN_ADDR", "0.0.0.0:8088")
            .parse()
            .context("Invalid TB_LISTEN_ADDR")?;
        let db_path = env_or("TB_DB_PATH", "./data/tradeboard.db");
        let market_data_url = env_or("TB_MARKET_DATA_URL", YAHOO_BASE_URL);
        let timeout_secs: u64 = env_parsed("TB_MARKET_DATA_TIMEOUT_SECS", 8)?;
        let backfill_concurrency: usize =
            env_parsed("TB_BACKFILL_CONCURRENCY", DEFAULT_BACKFILL_CONCURRENCY)?;
        let leaderboard_window_days: i64 =
            env_parsed("TB_LEADERBOARD_WINDOW_DAYS", DEFAULT_LEADERBOARD_WINDOW_DAYS)?;
        let coverage_policy: CoveragePolicy =
            env_parsed("TB_COVERAGE_POLICY", CoveragePolicy::default())?;
        let snapshot_secs: u64 = env_parsed("TB_SNAPSHOT_INTERVAL_SECS", 86_400)?;
        let cors_allow = env_or("TB_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let request_timeout_secs: u64 = env_parsed("TB_REQUEST_TIMEOUT_SECS", 30)?;
        let log_format = match env_or("TB_LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            db_path,
            market_data_url,
            market_data_timeout: Duration::from_secs(timeout_secs.max(1)),
            backfill_concurrency: backfill_concurrency.max(1),
            leaderboard_window_days,
            coverage_policy,
            snapshot_interval: (snapshot_secs > 0).then(|| Duration::from_secs(snapshot_secs)),
            cors_allow,
            request_timeout: Duration::from_secs(request_timeout_secs.max(1)),
            log_format,
        })
    }
}

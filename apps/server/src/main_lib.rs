use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use tradeboard_core::{
    portfolio::{
        holdings::{HoldingsService, HoldingsServiceTrait},
        leaderboard::{LeaderboardService, LeaderboardServiceTrait},
        performance::{PerformanceService, PerformanceServiceTrait},
        snapshot::{SnapshotService, SnapshotServiceTrait},
    },
    quotes::{PriceCacheConfig, PriceCacheService, PriceCacheServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    users::{UserService, UserServiceTrait},
};
use tradeboard_market_data::YahooProvider;
use tradeboard_storage_sqlite::{
    db, PriceRepository, SnapshotRepository, TransactionRepository, UserRepository,
};

use crate::config::{Config, LogFormat};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub holdings_service: Arc<dyn HoldingsServiceTrait>,
    pub performance_service: Arc<dyn PerformanceServiceTrait>,
    pub leaderboard_service: Arc<dyn LeaderboardServiceTrait>,
    pub snapshot_service: Arc<dyn SnapshotServiceTrait>,
    pub price_cache: Arc<dyn PriceCacheServiceTrait>,
    /// Used when `windowDays` is absent from a leaderboard request
    pub default_window_days: i64,
}

pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format == LogFormat::Json {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let transaction_repository =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let price_repository = Arc::new(PriceRepository::new(pool.clone(), writer.clone()));
    let snapshot_repository = Arc::new(SnapshotRepository::new(pool.clone(), writer.clone()));

    let provider = Arc::new(YahooProvider::new(
        config.market_data_url.clone(),
        config.market_data_timeout,
    )?);
    tracing::info!(
        "Market data from {} (timeout {:?}, coverage {:?})",
        config.market_data_url,
        config.market_data_timeout,
        config.coverage_policy
    );

    let price_cache: Arc<dyn PriceCacheServiceTrait> = Arc::new(PriceCacheService::new(
        price_repository,
        provider,
        PriceCacheConfig {
            coverage_policy: config.coverage_policy,
            max_concurrency: config.backfill_concurrency,
            ..PriceCacheConfig::default()
        },
    ));

    let user_service = Arc::new(UserService::new(user_repository.clone()));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repository.clone(),
        user_repository.clone(),
    ));
    let holdings_service = Arc::new(HoldingsService::new(transaction_repository.clone()));
    let performance_service: Arc<dyn PerformanceServiceTrait> = Arc::new(
        PerformanceService::new(transaction_repository.clone(), price_cache.clone()),
    );
    let leaderboard_service = Arc::new(LeaderboardService::new(
        user_repository.clone(),
        transaction_repository.clone(),
        performance_service.clone(),
        price_cache.clone(),
    ));
    let snapshot_service = Arc::new(SnapshotService::new(
        snapshot_repository,
        user_repository,
        transaction_repository,
        price_cache.clone(),
    ));

    Ok(Arc::new(AppState {
        user_service,
        transaction_service,
        holdings_service,
        performance_service,
        leaderboard_service,
        snapshot_service,
        price_cache,
        default_window_days: config.leaderboard_window_days,
    }))
}

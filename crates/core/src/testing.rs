//! In-memory doubles shared by the service tests.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tradeboard_market_data::{
    ChartRange, DailyBar, MarketDataError, MarketDataProvider, PriceSeries, RateLimit,
};

use crate::errors::{Error, Result};
use crate::portfolio::snapshot::{PortfolioSnapshot, SnapshotRepositoryTrait};
use crate::quotes::{HistoricalPrice, PriceStore};
use crate::transactions::{
    sort_for_replay, NewTransaction, Transaction, TransactionRepositoryTrait, TransactionSide,
};
use crate::users::{NewUser, User, UserRepositoryTrait};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn tx(
    id: i64,
    user_id: &str,
    symbol: &str,
    side: TransactionSide,
    shares: &str,
    price: &str,
    transaction_date: NaiveDate,
) -> Transaction {
    Transaction {
        id,
        user_id: user_id.to_string(),
        symbol: symbol.to_string(),
        side,
        shares: dec(shares),
        price_per_share: dec(price),
        transaction_date,
        created_at: Utc::now().naive_utc(),
    }
}

pub fn buy(id: i64, symbol: &str, shares: &str, price: &str, on: NaiveDate) -> Transaction {
    tx(id, "alice", symbol, TransactionSide::Buy, shares, price, on)
}

pub fn sell(id: i64, symbol: &str, shares: &str, price: &str, on: NaiveDate) -> Transaction {
    tx(id, "alice", symbol, TransactionSide::Sell, shares, price, on)
}

pub fn price(symbol: &str, on: NaiveDate, close: &str) -> HistoricalPrice {
    HistoricalPrice {
        symbol: symbol.to_string(),
        price_date: on,
        open: None,
        high: None,
        low: None,
        close: dec(close),
        volume: None,
    }
}

pub fn bar(on: NaiveDate, close: &str) -> DailyBar {
    DailyBar {
        date: on,
        open: None,
        high: None,
        low: None,
        close: dec(close),
        volume: None,
    }
}

// --- Transactions ---

#[derive(Default)]
pub struct InMemoryTransactionRepository {
    rows: RwLock<Vec<Transaction>>,
    next_id: AtomicI64,
}

impl InMemoryTransactionRepository {
    pub fn with(transactions: Vec<Transaction>) -> Self {
        let next_id = transactions.iter().map(|t| t.id).max().unwrap_or(0);
        Self {
            rows: RwLock::new(transactions),
            next_id: AtomicI64::new(next_id),
        }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for InMemoryTransactionRepository {
    fn list_by_user(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let mut rows: Vec<Transaction> = self
            .rows
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        sort_for_replay(&mut rows);
        Ok(rows)
    }

    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let transaction = Transaction {
            id,
            user_id: new_transaction.user_id,
            symbol: new_transaction.symbol,
            side: new_transaction.side,
            shares: new_transaction.shares,
            price_per_share: new_transaction.price_per_share,
            transaction_date: new_transaction.transaction_date,
            created_at: Utc::now().naive_utc(),
        };
        self.rows.write().unwrap().push(transaction.clone());
        Ok(transaction)
    }

    async fn delete_for_user(&self, user_id: &str, transaction_id: i64) -> Result<usize> {
        let mut rows = self.rows.write().unwrap();
        let before = rows.len();
        rows.retain(|t| !(t.id == transaction_id && t.user_id == user_id));
        Ok(before - rows.len())
    }
}

// --- Users ---

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<BTreeMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn with(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id.clone(), u)).collect()),
        }
    }
}

pub fn user(id: &str, share_daily_returns: bool, share_full_portfolio: bool) -> User {
    let now = Utc::now().naive_utc();
    User {
        id: id.to_string(),
        display_name: id.to_uppercase(),
        share_daily_returns,
        share_full_portfolio,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryUserRepository {
    fn get_by_id(&self, user_id: &str) -> Result<User> {
        self.users
            .read()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("user {}", user_id)))
    }

    fn list(&self) -> Result<Vec<User>> {
        Ok(self.users.read().unwrap().values().cloned().collect())
    }

    fn list_sharing(&self) -> Result<Vec<User>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .filter(|u| u.is_sharing())
            .cloned()
            .collect())
    }

    async fn upsert(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.write().unwrap();
        let now = Utc::now().naive_utc();
        let created_at = users.get(&new_user.id).map(|u| u.created_at).unwrap_or(now);
        let stored = User {
            id: new_user.id.clone(),
            display_name: new_user.display_name,
            share_daily_returns: new_user.share_daily_returns,
            share_full_portfolio: new_user.share_full_portfolio,
            created_at,
            updated_at: now,
        };
        users.insert(new_user.id, stored.clone());
        Ok(stored)
    }
}

// --- Prices ---

#[derive(Default)]
pub struct InMemoryPriceStore {
    rows: RwLock<BTreeMap<(String, NaiveDate), HistoricalPrice>>,
}

impl InMemoryPriceStore {
    pub fn with(prices: Vec<HistoricalPrice>) -> Self {
        Self {
            rows: RwLock::new(
                prices
                    .into_iter()
                    .map(|p| ((p.symbol.clone(), p.price_date), p))
                    .collect(),
            ),
        }
    }

    pub fn count(&self, symbol: &str) -> usize {
        self.rows
            .read()
            .unwrap()
            .keys()
            .filter(|(s, _)| s == symbol)
            .count()
    }

    pub fn close_on(&self, symbol: &str, on: NaiveDate) -> Option<Decimal> {
        self.rows
            .read()
            .unwrap()
            .get(&(symbol.to_string(), on))
            .map(|p| p.close)
    }
}

#[async_trait]
impl PriceStore for InMemoryPriceStore {
    fn get_price_on_or_before(
        &self,
        symbol: &str,
        on: NaiveDate,
    ) -> Result<Option<HistoricalPrice>> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .range((symbol.to_string(), NaiveDate::MIN)..=(symbol.to_string(), on))
            .next_back()
            .map(|(_, p)| p.clone()))
    }

    fn get_prices_in_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HistoricalPrice>> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .range((symbol.to_string(), start)..=(symbol.to_string(), end))
            .map(|(_, p)| p.clone())
            .collect())
    }

    fn get_date_bounds_in_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let prices = self.get_prices_in_range(symbol, start, end)?;
        Ok(match (prices.first(), prices.last()) {
            (Some(first), Some(last)) => Some((first.price_date, last.price_date)),
            _ => None,
        })
    }

    async fn insert_prices_ignore_existing(&self, prices: Vec<HistoricalPrice>) -> Result<usize> {
        let mut rows = self.rows.write().unwrap();
        let mut inserted = 0;
        for p in prices {
            let key = (p.symbol.clone(), p.price_date);
            if !rows.contains_key(&key) {
                rows.insert(key, p);
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

// --- Market data ---

/// Provider double serving canned series per market symbol.
pub struct MockProvider {
    series: HashMap<String, Vec<DailyBar>>,
    latest: HashMap<String, Decimal>,
    failure: Option<fn() -> MarketDataError>,
    delay: Duration,
    max_concurrency: usize,
    pub calls: AtomicUsize,
    pub requested: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
            latest: HashMap::new(),
            failure: None,
            delay: Duration::ZERO,
            max_concurrency: 10,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn failing(failure: fn() -> MarketDataError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new()
        }
    }

    pub fn with_series(mut self, symbol: &str, bars: Vec<DailyBar>) -> Self {
        self.series.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_latest(mut self, symbol: &str, latest: &str) -> Self {
        self.latest.insert(symbol.to_string(), dec(latest));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 600,
            max_concurrency: self.max_concurrency,
            min_delay: Duration::from_millis(1),
        }
    }

    async fn get_price_series(
        &self,
        symbol: &str,
        _range: ChartRange,
    ) -> std::result::Result<PriceSeries, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(symbol.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(failure) = self.failure {
            return Err(failure());
        }
        let bars = self
            .series
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;
        if bars.is_empty() {
            return Err(MarketDataError::NoDataForRange);
        }
        Ok(PriceSeries {
            symbol: symbol.to_string(),
            currency: "USD".to_string(),
            bars,
            regular_market_price: self.latest.get(symbol).copied(),
            previous_close: None,
        })
    }
}

// --- Snapshots ---

#[derive(Default)]
pub struct InMemorySnapshotRepository {
    rows: RwLock<BTreeMap<(String, NaiveDate), PortfolioSnapshot>>,
}

impl InMemorySnapshotRepository {
    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for InMemorySnapshotRepository {
    async fn upsert_snapshot(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot> {
        let mut rows = self.rows.write().unwrap();
        let key = (snapshot.user_id.clone(), snapshot.snapshot_date);
        let stored = match rows.get(&key) {
            Some(existing) => PortfolioSnapshot {
                created_at: existing.created_at,
                ..snapshot
            },
            None => snapshot,
        };
        rows.insert(key, stored.clone());
        Ok(stored)
    }

    fn list_snapshots_since(
        &self,
        user_id: &str,
        since: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioSnapshot>> {
        let since = since.unwrap_or(NaiveDate::MIN);
        Ok(self
            .rows
            .read()
            .unwrap()
            .range((user_id.to_string(), since)..=(user_id.to_string(), NaiveDate::MAX))
            .map(|(_, s)| s.clone())
            .collect())
    }
}

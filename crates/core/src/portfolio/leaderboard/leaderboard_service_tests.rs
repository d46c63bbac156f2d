use std::sync::Arc;

use rust_decimal_macros::dec;

use super::*;
use crate::portfolio::performance::PerformanceService;
use crate::quotes::{PriceCacheConfig, PriceCacheService};
use crate::testing::*;
use crate::transactions::{Transaction, TransactionSide};
use crate::users::User;

fn fixture(
    users: Vec<User>,
    transactions: Vec<Transaction>,
    provider: MockProvider,
) -> (LeaderboardService, Arc<MockProvider>) {
    let provider = Arc::new(provider);
    let cache = Arc::new(PriceCacheService::new(
        Arc::new(InMemoryPriceStore::default()),
        provider.clone(),
        PriceCacheConfig::default(),
    ));
    let transactions = Arc::new(InMemoryTransactionRepository::with(transactions));
    let performance = Arc::new(PerformanceService::new(transactions.clone(), cache.clone()));
    let service = LeaderboardService::new(
        Arc::new(InMemoryUserRepository::with(users)),
        transactions,
        performance,
        cache,
    );
    (service, provider)
}

fn buy_for(
    id: i64,
    user_id: &str,
    symbol: &str,
    shares: &str,
    price: &str,
    on: chrono::NaiveDate,
) -> Transaction {
    tx(id, user_id, symbol, TransactionSide::Buy, shares, price, on)
}

fn market() -> MockProvider {
    MockProvider::new()
        .with_series(
            "AAPL",
            vec![bar(date(2024, 3, 4), "110"), bar(date(2024, 3, 14), "120")],
        )
        .with_series(
            "MSFT",
            vec![bar(date(2024, 3, 8), "100"), bar(date(2024, 3, 14), "90")],
        )
        .with_series(
            "GLD",
            vec![bar(date(2024, 3, 1), "50"), bar(date(2024, 3, 14), "52.5")],
        )
}

fn standings() -> (LeaderboardService, Arc<MockProvider>) {
    fixture(
        vec![
            user("alice", true, true),
            user("bob", true, false),
            user("carol", true, false),
            user("dave", false, false),
            user("erin", true, false),
        ],
        vec![
            buy_for(1, "alice", "AAPL", "10", "100", date(2024, 2, 1)),
            buy_for(2, "bob", "MSFT", "10", "100", date(2024, 3, 8)),
            buy_for(3, "carol", "GOLD", "4", "50", date(2024, 3, 1)),
            buy_for(4, "dave", "AAPL", "1", "1", date(2024, 2, 1)),
        ],
        market(),
    )
}

#[tokio::test]
async fn test_ranks_by_return_descending() {
    let (service, _) = standings();
    let board = service
        .get_leaderboard_as_of(10, date(2024, 3, 15))
        .await
        .unwrap();

    let order: Vec<(&str, usize)> = board.iter().map(|r| (r.user_id.as_str(), r.rank)).collect();
    assert_eq!(order, vec![("alice", 1), ("carol", 2), ("bob", 3)]);
    assert_eq!(board[0].current_return_pct, dec!(20));
    assert_eq!(board[0].current_value, dec!(1200));
    assert_eq!(board[0].current_cost, dec!(1000));
    assert_eq!(board[1].current_return_pct, dec!(5));
    assert_eq!(board[2].current_return_pct, dec!(-10));
}

#[tokio::test]
async fn test_excludes_non_sharing_and_empty_users() {
    let (service, _) = standings();
    let board = service
        .get_leaderboard_as_of(10, date(2024, 3, 15))
        .await
        .unwrap();

    assert!(board.iter().all(|r| r.user_id != "dave"));
    assert!(board.iter().all(|r| r.user_id != "erin"));
    assert_eq!(board.len(), 3);
}

#[tokio::test]
async fn test_holdings_only_for_full_portfolio_sharers() {
    let (service, _) = standings();
    let board = service
        .get_leaderboard_as_of(10, date(2024, 3, 15))
        .await
        .unwrap();

    let alice = &board[0];
    assert!(alice.shares_full_portfolio);
    assert!(alice.performance_series.iter().all(|p| !p.holdings.is_empty()));

    for entry in &board[1..] {
        assert!(!entry.shares_full_portfolio);
        assert!(entry.performance_series.iter().all(|p| p.holdings.is_empty()));
    }
}

#[tokio::test]
async fn test_window_starts_at_later_of_floor_and_first_trade() {
    let (service, _) = standings();
    let board = service
        .get_leaderboard_as_of(10, date(2024, 3, 15))
        .await
        .unwrap();

    let alice = board.iter().find(|r| r.user_id == "alice").unwrap();
    assert_eq!(alice.window_start, date(2024, 3, 5));
    assert_eq!(alice.window_end, date(2024, 3, 15));
    assert_eq!(alice.performance_series.len(), 11);

    let bob = board.iter().find(|r| r.user_id == "bob").unwrap();
    assert_eq!(bob.window_start, date(2024, 3, 8));
    assert_eq!(bob.performance_series.len(), 8);
}

#[tokio::test]
async fn test_prefetches_each_market_symbol_once() {
    let (service, provider) = standings();
    service
        .get_leaderboard_as_of(10, date(2024, 3, 15))
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 3);
    let mut requested = provider.requested.lock().unwrap().clone();
    requested.sort();
    assert_eq!(requested, vec!["AAPL", "GLD", "MSFT"]);
}

#[tokio::test]
async fn test_ties_keep_user_id_order() {
    let (service, _) = fixture(
        vec![user("zed", true, false), user("amy", true, false)],
        vec![
            buy_for(1, "zed", "MSFT", "1", "100", date(2024, 3, 8)),
            buy_for(2, "amy", "MSFT", "2", "100", date(2024, 3, 8)),
        ],
        market(),
    );

    let board = service
        .get_leaderboard_as_of(30, date(2024, 3, 15))
        .await
        .unwrap();
    assert_eq!(board[0].user_id, "amy");
    assert_eq!(board[1].user_id, "zed");
    assert_eq!(board[0].current_return_pct, board[1].current_return_pct);
    assert_eq!((board[0].rank, board[1].rank), (1, 2));
}

#[tokio::test]
async fn test_window_is_clamped_to_at_least_one_day() {
    let (service, _) = standings();
    let board = service
        .get_leaderboard_as_of(0, date(2024, 3, 15))
        .await
        .unwrap();

    let alice = board.iter().find(|r| r.user_id == "alice").unwrap();
    assert_eq!(alice.window_start, date(2024, 3, 14));
    assert_eq!(alice.performance_series.len(), 2);
}

#[tokio::test]
async fn test_no_sharing_users_yields_empty_board() {
    let (service, provider) = fixture(
        vec![user("dave", false, false)],
        vec![buy_for(1, "dave", "AAPL", "1", "100", date(2024, 3, 1))],
        market(),
    );
    let board = service
        .get_leaderboard_as_of(30, date(2024, 3, 15))
        .await
        .unwrap();
    assert!(board.is_empty());
    assert_eq!(provider.call_count(), 0);
}

//! Leaderboard - opted-in users ranked by reconstructed return over a trailing window.

mod leaderboard_model;
mod leaderboard_service;

pub use leaderboard_model::RankedUser;
pub use leaderboard_service::{LeaderboardService, LeaderboardServiceTrait};

#[cfg(test)]
mod leaderboard_service_tests;

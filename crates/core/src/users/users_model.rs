//! User registry domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A registered user and their sharing preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    /// Publish value and return numbers on the leaderboard
    pub share_daily_returns: bool,
    /// Additionally publish the per-day holdings breakdown
    pub share_full_portfolio: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// Whether the user opted into the leaderboard at all.
    pub fn is_sharing(&self) -> bool {
        self.share_daily_returns || self.share_full_portfolio
    }
}

/// Input model for creating or updating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub share_daily_returns: bool,
    #[serde(default)]
    pub share_full_portfolio: bool,
}

/// Sharing flags on their own, for updates that leave the profile alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingPreferences {
    pub share_daily_returns: bool,
    pub share_full_portfolio: bool,
}

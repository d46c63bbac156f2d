use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tradeboard_core::portfolio::leaderboard::RankedUser;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardQuery {
    window_days: Option<i64>,
}

async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LeaderboardQuery>,
) -> ApiResult<Json<Vec<RankedUser>>> {
    let window_days = q.window_days.unwrap_or(state.default_window_days);
    let board = state.leaderboard_service.get_leaderboard(window_days).await?;
    Ok(Json(board))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/leaderboard", get(get_leaderboard))
}

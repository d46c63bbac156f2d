use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tradeboard_core::portfolio::snapshot::{NewSnapshot, PortfolioSnapshot};

use super::shared::parse_date_param;
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn save_snapshot(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<NewSnapshot>,
) -> ApiResult<Json<PortfolioSnapshot>> {
    payload.user_id = user_id;
    let snapshot = state.snapshot_service.save_snapshot(payload).await?;
    Ok(Json(snapshot))
}

async fn capture_snapshot(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortfolioSnapshot>> {
    state
        .snapshot_service
        .capture_snapshot(&user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No transactions recorded for {}", user_id)))
}

#[derive(Deserialize)]
struct SnapshotsQuery {
    since: Option<String>,
}

async fn list_snapshots(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<SnapshotsQuery>,
) -> ApiResult<Json<Vec<PortfolioSnapshot>>> {
    let since = parse_date_param("since", q.since.as_deref())?;
    let snapshots = state.snapshot_service.list_snapshots(&user_id, since)?;
    Ok(Json(snapshots))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/{user_id}/snapshots",
            post(save_snapshot).get(list_snapshots),
        )
        .route("/users/{user_id}/snapshots/capture", post(capture_snapshot))
}

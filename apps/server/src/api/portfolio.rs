use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tradeboard_core::{
    portfolio::{holdings::Holding, performance::DailyPerformancePoint},
    utils::time_utils::valuation_date_today,
};

use super::shared::parse_date_param;
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HoldingsQuery {
    as_of: Option<String>,
}

async fn get_holdings(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<HoldingsQuery>,
) -> ApiResult<Json<Vec<Holding>>> {
    let as_of = parse_date_param("asOf", q.as_of.as_deref())?;
    let holdings = state.holdings_service.get_holdings(&user_id, as_of)?;
    Ok(Json(holdings))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceQuery {
    start_date: Option<String>,
    end_date: Option<String>,
    include_holdings: Option<bool>,
}

async fn get_daily_performance(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<PerformanceQuery>,
) -> ApiResult<Json<Vec<DailyPerformancePoint>>> {
    let today = valuation_date_today();
    let start = parse_date_param("startDate", q.start_date.as_deref())?
        .ok_or_else(|| ApiError::BadRequest("startDate is required".to_string()))?;
    // Nothing past today can be priced
    let end = parse_date_param("endDate", q.end_date.as_deref())?
        .unwrap_or(today)
        .min(today);

    let series = state
        .performance_service
        .get_daily_performance(&user_id, start, end)
        .await?;

    if q.include_holdings.unwrap_or(true) {
        Ok(Json(series))
    } else {
        Ok(Json(
            series.into_iter().map(|p| p.without_holdings()).collect(),
        ))
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{user_id}/holdings", get(get_holdings))
        .route("/users/{user_id}/performance", get(get_daily_performance))
}

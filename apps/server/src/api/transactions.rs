use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use tradeboard_core::transactions::{NewTransaction, Transaction};

use crate::{error::ApiResult, main_lib::AppState};

async fn record_transaction(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    payload.user_id = user_id;
    let created = state.transaction_service.record_transaction(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_transactions(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = state.transaction_service.list_transactions(&user_id)?;
    Ok(Json(transactions))
}

async fn delete_transaction(
    Path((user_id, transaction_id)): Path<(String, i64)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state
        .transaction_service
        .delete_transaction(&user_id, transaction_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/{user_id}/transactions",
            post(record_transaction).get(list_transactions),
        )
        .route(
            "/users/{user_id}/transactions/{transaction_id}",
            delete(delete_transaction),
        )
}

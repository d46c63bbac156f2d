use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::put,
    Json, Router,
};
use tradeboard_core::users::{NewUser, SharingPreferences, User};

use crate::{error::ApiResult, main_lib::AppState};

async fn upsert_user(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<NewUser>,
) -> ApiResult<Json<User>> {
    payload.id = user_id;
    let user = state.user_service.upsert_user(payload).await?;
    Ok(Json(user))
}

async fn get_user(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.get_user(&user_id)?;
    Ok(Json(user))
}

async fn update_sharing(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(preferences): Json<SharingPreferences>,
) -> ApiResult<Json<User>> {
    let user = state
        .user_service
        .update_sharing(&user_id, preferences)
        .await?;
    Ok(Json(user))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{user_id}", put(upsert_user).get(get_user))
        .route("/users/{user_id}/sharing", put(update_sharing))
}

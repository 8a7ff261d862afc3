//! Cache administration endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;

#[derive(Debug, Serialize)]
pub struct KeysResponse {
    pub keys: Vec<String>,
    pub count: usize,
}

/// `GET /api/cache/keys`
pub async fn keys(State(state): State<AppState>) -> Result<Json<KeysResponse>, ApiError> {
    let keys = state.cache.keys().await?;
    let count = keys.len();
    Ok(Json(KeysResponse { keys, count }))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: usize,
}

/// `DELETE /api/cache/:key`
pub async fn delete_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if state.cache.del(&key).await? {
        Ok(Json(DeleteResponse { deleted: 1 }))
    } else {
        Err(ApiError::NotFound(key))
    }
}

/// `DELETE /api/cache`
pub async fn clear(State(state): State<AppState>) -> Result<Json<DeleteResponse>, ApiError> {
    let keys = state.cache.keys().await?;
    let mut deleted = 0;
    for key in &keys {
        if state.cache.del(key).await? {
            deleted += 1;
        }
    }
    Ok(Json(DeleteResponse { deleted }))
}

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::AddRepositoryRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::types::RepositoryEntry;

/// Links a set into the caller's repository. Linking the same set twice is a
/// conflict, not a silent success.
pub async fn add_entry(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddRepositoryRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let set = store
        .get_set(&req.set_id)
        .api_err("Failed to get set")?
        .or_not_found("Set not found")?;

    if !set.is_public && set.owner_id != auth.user.id {
        return Err(ApiError::not_found("Set not found"));
    }

    let now = Utc::now();
    let entry = RepositoryEntry {
        user_id: auth.user.id.clone(),
        set_id: set.id.clone(),
        added_at: now,
        last_accessed_at: now,
    };

    store
        .add_repository_entry(&entry)
        .api_err("Set is already in your repository")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(entry))))
}

pub async fn remove_entry(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(set_id): Path<String>,
) -> impl IntoResponse {
    let removed = state
        .store
        .remove_repository_entry(&auth.user.id, &set_id)
        .api_err("Failed to remove repository entry")?;

    if !removed {
        return Err(ApiError::not_found("Set is not in your repository"));
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(serde_json::json!({
        "removed": true
    }))))
}

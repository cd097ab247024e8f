use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{CreateSetRequest, DeleteSetParams, ListSetsParams, UpdateSetRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_set_title;
use crate::store::{SetOrder, Store};
use crate::types::{Set, SetSummary};

/// Loads a set the user is allowed to read: their own, one linked in their
/// repository, or any public set. Private sets they have no relation to are
/// indistinguishable from missing ones.
pub fn load_readable_set(store: &dyn Store, user_id: &str, set_id: &str) -> Result<Set, ApiError> {
    let set = store
        .get_set(set_id)
        .api_err("Failed to get set")?
        .or_not_found("Set not found")?;

    if set.owner_id == user_id || set.is_public {
        return Ok(set);
    }

    let linked = store
        .get_repository_entry(user_id, set_id)
        .api_err("Failed to check repository")?
        .is_some();

    if linked {
        Ok(set)
    } else {
        Err(ApiError::not_found("Set not found"))
    }
}

pub async fn list_sets(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListSetsParams>,
) -> impl IntoResponse {
    let order = match params.order.as_deref() {
        Some("recent") => SetOrder::Recent,
        Some(other) => {
            return Err(ApiError::bad_request(format!("Unknown order: {other}")));
        }
        None => SetOrder::Unordered,
    };

    let sets = state
        .store
        .list_user_sets(&auth.user.id, order)
        .api_err("Failed to list sets")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(sets)))
}

pub async fn create_set(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSetRequest>,
) -> impl IntoResponse {
    validate_set_title(&req.title)?;

    let now = Utc::now();
    let set = Set {
        id: Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        description: req.description.filter(|d| !d.trim().is_empty()),
        owner_id: auth.user.id.clone(),
        is_public: req.is_public,
        created_at: now,
        updated_at: now,
    };

    // The set and the owner's repository link land together or not at all.
    state
        .store
        .create_set_with_entry(&set)
        .api_err("Failed to create set")?;

    let summary = SetSummary {
        set,
        card_count: 0,
        is_owner: true,
    };

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(summary))))
}

pub async fn get_set(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let set = load_readable_set(store, &auth.user.id, &id)?;

    let card_count = store
        .count_set_cards(&set.id)
        .api_err("Failed to count cards")?;
    let is_owner = set.owner_id == auth.user.id;

    Ok::<_, ApiError>(Json(ApiResponse::success(SetSummary {
        set,
        card_count,
        is_owner,
    })))
}

pub async fn update_set(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSetRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let mut set = store
        .get_set(&id)
        .api_err("Failed to get set")?
        .or_not_found("Set not found")?;

    if set.owner_id != auth.user.id {
        return Err(ApiError::forbidden("Only the owner can edit a set"));
    }

    if let Some(title) = req.title {
        validate_set_title(&title)?;
        set.title = title.trim().to_string();
    }
    if let Some(description) = req.description {
        set.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
    }
    if let Some(is_public) = req.is_public {
        set.is_public = is_public;
    }
    set.updated_at = Utc::now();

    store.update_set(&set).api_err("Failed to update set")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(set)))
}

/// Removing a set always drops the caller's repository link. Deleting it for
/// everyone is an owner-only escalation on top of that.
pub async fn delete_set(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<DeleteSetParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let set = store
        .get_set(&id)
        .api_err("Failed to get set")?
        .or_not_found("Set not found")?;

    if params.everyone && set.owner_id != auth.user.id {
        return Err(ApiError::forbidden("Only the owner can delete a set for everyone"));
    }

    store
        .remove_repository_entry(&auth.user.id, &id)
        .api_err("Failed to remove repository entry")?;

    let deleted_everywhere = if params.everyone {
        store.delete_set(&id).api_err("Failed to delete set")?
    } else {
        false
    };

    Ok::<_, ApiError>(Json(ApiResponse::success(serde_json::json!({
        "removed": true,
        "deleted_everywhere": deleted_everywhere
    }))))
}

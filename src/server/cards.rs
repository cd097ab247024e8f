use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::editing::plan_save;
use crate::server::AppState;
use crate::server::dto::SaveCardsRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::sets::load_readable_set;

/// Fetching cards is what a review session does, so it also counts as a
/// repository access for the recency ordering.
pub async fn list_cards(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let set = load_readable_set(store, &auth.user.id, &id)?;

    let cards = store
        .list_set_cards(&set.id)
        .api_err("Failed to list cards")?;

    if let Err(e) = store.touch_repository_entry(&auth.user.id, &set.id) {
        tracing::warn!("Failed to touch repository entry: {e}");
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(cards)))
}

/// Replaces the set's cards with the submitted editing-session list. The
/// diff is computed against what is persisted right now, and applied as a
/// single transaction.
pub async fn save_cards(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SaveCardsRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let set = store
        .get_set(&id)
        .api_err("Failed to get set")?
        .or_not_found("Set not found")?;

    if set.owner_id != auth.user.id {
        return Err(ApiError::forbidden("Only the owner can edit cards"));
    }

    let current_ids: Vec<String> = store
        .list_set_cards(&set.id)
        .api_err("Failed to list cards")?
        .into_iter()
        .map(|c| c.id)
        .collect();

    let plan = plan_save(&current_ids, &req.cards);

    store
        .apply_card_changes(&set.id, &auth.user.id, &plan.delete_ids, &plan.upserts)
        .api_err("Failed to save cards")?;

    let cards = store
        .list_set_cards(&set.id)
        .api_err("Failed to list cards")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(cards)))
}

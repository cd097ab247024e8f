use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

/// Public sets the user has not linked yet. A user with an empty repository
/// sees every public set.
pub async fn list_discoverable(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let sets = state
        .store
        .list_discoverable_sets(&auth.user.id)
        .api_err("Failed to list discoverable sets")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(sets)))
}

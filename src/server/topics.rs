use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::types::{Topic, unescape_newlines};

pub async fn list_subjects(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let subjects = state
        .store
        .list_subjects()
        .api_err("Failed to list subjects")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(subjects)))
}

pub async fn list_topics(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    store
        .list_subjects()
        .api_err("Failed to list subjects")?
        .into_iter()
        .find(|s| s.id == id)
        .or_not_found("Subject not found")?;

    let topics = store
        .list_subject_topics(&id)
        .api_err("Failed to list topics")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(topics)))
}

#[derive(Debug, Serialize)]
pub struct TopicDetail {
    #[serde(flatten)]
    pub topic: Topic,
    /// The explanation with literal `\n` sequences expanded to line breaks.
    pub rendered_explanation: String,
}

pub async fn get_topic(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let topic = state
        .store
        .get_topic(&id)
        .api_err("Failed to get topic")?
        .or_not_found("Topic not found")?;

    let rendered_explanation = unescape_newlines(&topic.explanation);

    Ok::<_, ApiError>(Json(ApiResponse::success(TopicDetail {
        topic,
        rendered_explanation,
    })))
}

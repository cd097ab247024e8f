use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;

use crate::auth::RequireUser;
use crate::media::MediaStoreError;
use crate::server::AppState;
use crate::server::dto::{UpdateProfileRequest, UploadAvatarRequest};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::validate_display_name;

const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

pub async fn update_profile(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    let mut user = auth.user;

    if let Some(name) = req.name {
        validate_display_name(&name)?;
        user.name = name.trim().to_string();
    }
    user.updated_at = Utc::now();

    state
        .store
        .update_user(&user)
        .api_err("Failed to update profile")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(user)))
}

pub async fn upload_avatar(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadAvatarRequest>,
) -> impl IntoResponse {
    let bytes = BASE64
        .decode(req.data.as_bytes())
        .map_err(|_| ApiError::bad_request("Avatar data is not valid base64"))?;

    if bytes.is_empty() {
        return Err(ApiError::bad_request("Avatar data is empty"));
    }
    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(ApiError::bad_request("Avatar exceeds the 5MB limit"));
    }

    state
        .media
        .put(&auth.user.id, &bytes)
        .await
        .map_err(|_| ApiError::internal("Failed to store avatar"))?;

    let mut user = auth.user;
    user.profile_picture = Some(format!("/api/v1/users/{}/avatar", user.id));
    user.updated_at = Utc::now();

    state
        .store
        .update_user(&user)
        .api_err("Failed to update profile")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(user)))
}

pub async fn get_avatar(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let bytes = state.media.get(&id).await.map_err(|e| match e {
        MediaStoreError::NotFound | MediaStoreError::InvalidOwner => {
            ApiError::not_found("Avatar not found")
        }
        MediaStoreError::Io(_) => ApiError::internal("Failed to read avatar"),
    })?;

    let content_type = sniff_image_type(&bytes);

    Ok::<_, ApiError>((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        bytes,
    ))
}

fn sniff_image_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() > 11 && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_common_image_formats() {
        assert_eq!(sniff_image_type(&[0x89, b'P', b'N', b'G', 0, 0]), "image/png");
        assert_eq!(sniff_image_type(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(
            sniff_image_type(b"RIFF\x00\x00\x00\x00WEBPVP8 "),
            "image/webp"
        );
        assert_eq!(sniff_image_type(b"plain text"), "application/octet-stream");
    }
}

use serde::{Deserialize, Serialize};

use crate::editing::CardEntry;
use crate::types::User;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Returned by signup and signin. The raw token appears here and nowhere else.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct CreateSetRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSetRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListSetsParams {
    /// `recent` orders by last access, newest first.
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSetParams {
    /// Owners may delete the set for every user; defaults to unlink-only.
    #[serde(default)]
    pub everyone: bool,
}

/// The full editing-session card list at save time. The server diffs it
/// against the cards currently persisted for the set.
#[derive(Debug, Deserialize)]
pub struct SaveCardsRequest {
    pub cards: Vec<CardEntry>,
}

#[derive(Debug, Deserialize)]
pub struct AddRepositoryRequest {
    pub set_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadAvatarRequest {
    /// Base64-encoded image bytes.
    pub data: String,
}

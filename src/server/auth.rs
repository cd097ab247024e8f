use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::{RequireUser, TokenGenerator};
use crate::server::AppState;
use crate::server::dto::{AuthResponse, SigninRequest, SignupRequest};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::{validate_display_name, validate_email, validate_password};
use crate::types::{Session, User};

const SESSION_TTL_DAYS: i64 = 30;

fn open_session(state: &AppState, user_id: &str) -> Result<String, ApiError> {
    let generator = TokenGenerator::new();
    let (raw_token, lookup, hash) = generator
        .generate()
        .map_err(|_| ApiError::internal("Failed to generate session token"))?;

    let now = Utc::now();
    let session = Session {
        id: Uuid::new_v4().to_string(),
        token_hash: hash,
        token_lookup: lookup,
        user_id: user_id.to_string(),
        created_at: now,
        expires_at: Some(now + Duration::days(SESSION_TTL_DAYS)),
        last_used_at: None,
    };

    state
        .store
        .create_session(&session)
        .api_err("Failed to create session")?;

    Ok(raw_token)
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> impl IntoResponse {
    validate_email(&req.email)?;
    validate_display_name(&req.name)?;
    validate_password(&req.password)?;

    let store = state.store.as_ref();
    let email = req.email.trim().to_lowercase();

    if store
        .get_user_by_email(&email)
        .api_err("Failed to check email")?
        .is_some()
    {
        return Err(ApiError::conflict("An account with this email already exists"));
    }

    let generator = TokenGenerator::new();
    let password_hash = generator
        .hash(&req.password)
        .map_err(|_| ApiError::internal("Failed to hash password"))?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        name: req.name.trim().to_string(),
        password_hash,
        profile_picture: None,
        created_at: now,
        updated_at: now,
    };

    store.create_user(&user).api_err("Failed to create user")?;

    let token = open_session(&state, &user.id)?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(AuthResponse { token, user })),
    ))
}

pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SigninRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let email = req.email.trim().to_lowercase();

    let user = store
        .get_user_by_email(&email)
        .api_err("Failed to look up user")?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let generator = TokenGenerator::new();
    let verified = generator
        .verify(&req.password, &user.password_hash)
        .map_err(|_| ApiError::internal("Failed to verify password"))?;

    if !verified {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = open_session(&state, &user.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(AuthResponse { token, user })))
}

pub async fn signout(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    state
        .store
        .delete_session(&auth.session.id)
        .api_err("Failed to delete session")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(serde_json::json!({
        "signed_out": true
    }))))
}

pub async fn me(auth: RequireUser) -> impl IntoResponse {
    Json(ApiResponse::success(auth.user))
}

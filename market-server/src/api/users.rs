//! User profile API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/users/{id} | GET | none |
//! | /api/users/me | PUT | user |

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Serialize;
use shared::error::{ApiResponse, AppError, AppResult};
use shared::models::{SellerStats, UserProfile, UserProfileUpdate};

use crate::api::extract::AppJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/users/me", put(upsert_me))
        .route("/api/users/{id}", get(get_profile))
}

/// Profile as shown to other users
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub id: String,
    pub username: String,
    pub is_seller: bool,
    pub is_pro: bool,
    pub is_online: bool,
    pub stats: SellerStats,
    pub created_at: i64,
}

impl PublicProfile {
    fn from_profile(profile: UserProfile, now: i64) -> Self {
        Self {
            is_online: profile.is_online(now),
            id: profile.id,
            username: profile.username,
            is_seller: profile.is_seller,
            is_pro: profile.is_pro,
            stats: profile.stats,
            created_at: profile.created_at,
        }
    }
}

/// GET /api/users/{id}
pub async fn get_profile(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PublicProfile>> {
    let profile = state
        .accounts
        .get_user(&id)?
        .ok_or_else(|| AppError::user_not_found(id))?;
    Ok(ApiResponse::success(PublicProfile::from_profile(
        profile,
        shared::util::now_millis(),
    )))
}

/// PUT /api/users/me - create on first call, then edit username / seller flag
pub async fn upsert_me(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(update): AppJson<UserProfileUpdate>,
) -> AppResult<ApiResponse<UserProfile>> {
    if let Some(username) = &update.username {
        validate_required_text(username, "username", MAX_NAME_LEN)?;
    }
    let profile = state.accounts.upsert_profile(
        &user.id,
        &user.username,
        &update,
        shared::util::now_millis(),
    )?;
    tracing::info!(user_id = %user.id, is_seller = profile.is_seller, "Profile saved");
    Ok(ApiResponse::success(profile))
}

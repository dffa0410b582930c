//! Gig API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/gigs | GET | none |
//! | /api/gigs | POST | seller |
//! | /api/gigs/mine | GET | user |
//! | /api/gigs/{id} | GET | none |
//! | /api/gigs/{id} | PUT, DELETE | owner |
//! | /api/gigs/{id}/toggle-status | PATCH | owner |

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::Deserialize;
use shared::error::{ApiResponse, AppResult};
use shared::models::{Gig, GigCreate, GigUpdate};
use shared::response::{DEFAULT_PAGE_SIZE, PaginatedResponse, clamp_page};
use shared::search::{SearchParams, SearchResponse};

use crate::api::extract::AppJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/gigs", get(list).post(create))
        .route("/api/gigs/mine", get(mine))
        .route("/api/gigs/{id}", get(get_by_id).put(update).delete(delete))
        .route("/api/gigs/{id}/toggle-status", patch(toggle_status))
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/gigs - browse, or search when a query is present
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> AppResult<ApiResponse<SearchResponse>> {
    let request = params.parse();
    let mut response = state
        .search
        .search(&request, shared::util::now_millis())?;
    // Browse does not echo filters
    response.filters = None;
    Ok(ApiResponse::success(response))
}

/// GET /api/gigs/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Gig>> {
    Ok(ApiResponse::success(state.gigs.get_gig(id)?))
}

/// GET /api/gigs/mine - caller's gigs, paused included
pub async fn mine(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<Gig>>> {
    let (page, limit) = clamp_page(query.page, query.limit, DEFAULT_PAGE_SIZE);
    Ok(ApiResponse::success(
        state.gigs.list_seller_gigs(&user.id, page, limit)?,
    ))
}

/// POST /api/gigs
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<GigCreate>,
) -> AppResult<ApiResponse<Gig>> {
    let gig = state
        .gigs
        .create_gig(&user.id, payload, shared::util::now_millis())?;
    Ok(ApiResponse::success_with_message("Gig created", gig))
}

/// PUT /api/gigs/{id}
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<GigUpdate>,
) -> AppResult<ApiResponse<Gig>> {
    let gig = state
        .gigs
        .update_gig(&user.id, id, payload, shared::util::now_millis())?;
    Ok(ApiResponse::success(gig))
}

/// DELETE /api/gigs/{id}
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.gigs.delete_gig(&user.id, id)?;
    Ok(ApiResponse::ok())
}

/// PATCH /api/gigs/{id}/toggle-status
pub async fn toggle_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Gig>> {
    let gig = state
        .gigs
        .toggle_pause(&user.id, id, shared::util::now_millis())?;
    Ok(ApiResponse::success(gig))
}

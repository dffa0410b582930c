//! Search API (public)
//!
//! | Path | Method |
//! |------|--------|
//! | /api/search | GET |
//! | /api/search/suggestions | GET |
//! | /api/search/filters | GET |
//! | /api/search/trending | GET |

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use shared::error::{ApiResponse, AppResult};
use shared::search::{
    SearchFilters, SearchParams, SearchResponse, Suggestion, SuggestionParams, TrendingCategory,
};

use crate::catalog::search::clamp_limit;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/search", get(search))
        .route("/api/search/suggestions", get(suggestions))
        .route("/api/search/filters", get(filters))
        .route("/api/search/trending", get(trending))
}

/// GET /api/search - ranked results with the applied filters echoed back
pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> AppResult<ApiResponse<SearchResponse>> {
    let request = params.parse();
    let response = state
        .search
        .search(&request, shared::util::now_millis())?;
    Ok(ApiResponse::success(response))
}

/// GET /api/search/suggestions?q=&limit=
pub async fn suggestions(
    State(state): State<ServerState>,
    Query(params): Query<SuggestionParams>,
) -> AppResult<ApiResponse<Vec<Suggestion>>> {
    let fragment = params.q.unwrap_or_default();
    let limit = clamp_limit(params.limit.as_deref().and_then(|l| l.trim().parse().ok()));
    Ok(ApiResponse::success(
        state.search.suggestions(&fragment, limit)?,
    ))
}

/// GET /api/search/filters
pub async fn filters(State(state): State<ServerState>) -> AppResult<ApiResponse<SearchFilters>> {
    Ok(ApiResponse::success(state.search.filter_facets()?))
}

/// GET /api/search/trending
pub async fn trending(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<TrendingCategory>>> {
    Ok(ApiResponse::success(state.search.trending()?))
}

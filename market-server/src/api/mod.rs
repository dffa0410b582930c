//! HTTP API routes
//!
//! - [`health`] - liveness
//! - [`gigs`] - browse and seller gig management
//! - [`search`] - ranked search, suggestions, facets, trending
//! - [`orders`] - order lifecycle actions and queries
//! - [`users`] - public profiles and own profile upsert
//! - [`payments`] - payment gateway webhook and payment reports
//! - [`live_ws`] - per-user live event stream
//! - [`extract`] - JSON body extractor with `AppError` rejections

pub mod extract;
pub mod gigs;
pub mod health;
pub mod live_ws;
pub mod orders;
pub mod payments;
pub mod search;
pub mod users;

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use http::{HeaderName, HeaderValue, StatusCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

/// Request body cap
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, no middleware and no state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(gigs::router())
        .merge(search::router())
        .merge(orders::router())
        .merge(users::router())
        .merge(payments::router())
        .merge(live_ws::router())
}

/// Fully configured application, used by the server and by router tests
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);
    build_router()
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .with_state(state)
}

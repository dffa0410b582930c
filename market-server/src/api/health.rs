//! Liveness
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /health | GET | none |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    environment: String,
    payments_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    orders: Option<u64>,
    live_channels: usize,
}

/// GET /health
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let orders = match state.orders.storage().get_stats() {
        Ok(stats) => Some(stats.order_count),
        Err(e) => {
            tracing::error!(error = %e, "Health check could not read order storage");
            None
        }
    };
    Json(HealthResponse {
        status: if orders.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        payments_enabled: state.gateway.is_some(),
        orders,
        live_channels: state.live.channel_count(),
    })
}

//! Live event stream
//!
//! GET /api/live/ws?token=<JWT>
//!
//! Browsers cannot set headers on WebSocket upgrades, so the token travels
//! in the query string. Frames are JSON [`LiveMessage`] values.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::error::AppError;
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::auth::authenticate;
use crate::core::ServerState;
use crate::live::LiveMessage;

const PING_INTERVAL: Duration = Duration::from_secs(30);

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/live/ws", get(handle_live_ws))
}

#[derive(Deserialize)]
pub struct WsAuthQuery {
    token: String,
}

/// GET /api/live/ws?token=<JWT>
pub async fn handle_live_ws(
    State(state): State<ServerState>,
    Query(query): Query<WsAuthQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let user = authenticate(state.jwt_service(), &query.token, "/api/live/ws")?;
    Ok(ws.on_upgrade(move |socket| live_session(socket, state, user.id)))
}

async fn live_session(socket: WebSocket, state: ServerState, user_id: String) {
    let (mut sink, mut stream) = socket.split();
    let mut rx = state.live.subscribe(&user_id);
    tracing::info!(user_id = %user_id, "Live WS connected");

    let mut ping = tokio::time::interval(PING_INTERVAL);
    ping.tick().await;

    loop {
        tokio::select! {
            _ = ping.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            message = rx.recv() => match message {
                Ok(message) => {
                    if send_message(&mut sink, &message).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(user_id = %user_id, skipped, "Live subscriber lagged, resubscribing");
                    rx = state.live.subscribe(&user_id);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },

            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {
                    if let Err(e) = state.accounts.touch_last_seen(&user_id, shared::util::now_millis()) {
                        tracing::warn!(user_id = %user_id, error = %e, "Failed to record presence");
                    }
                }
            },
        }
    }

    tracing::info!(user_id = %user_id, "Live WS disconnected");
}

async fn send_message(
    sink: &mut SplitSink<WebSocket, Message>,
    message: &LiveMessage,
) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize live message");
            return Ok(());
        }
    };
    sink.send(Message::Text(json.into())).await
}

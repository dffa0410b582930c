//! Order API
//!
//! Every mutation goes through the OrdersManager as an [`OrderCommand`];
//! handlers only translate HTTP into commands and read back the snapshot.
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/orders | POST, GET | user |
//! | /api/orders/{id} | GET | party |
//! | /api/orders/{id}/events | GET | party |
//! | /api/orders/{id}/deliver | POST | seller |
//! | /api/orders/{id}/accept | POST | buyer |
//! | /api/orders/{id}/revision | POST | buyer |
//! | /api/orders/{id}/cancel | POST | party |
//! | /api/orders/{id}/review | POST | buyer |

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, AppResult};
use shared::models::PackageType;
use shared::order::{
    Actor, OrderCommand, OrderCommandPayload, OrderEvent, OrderSnapshot, OrderStatus,
    RequirementAnswer,
};
use shared::response::{DEFAULT_PAGE_SIZE, PaginatedResponse, clamp_page};

use crate::api::extract::AppJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::OrderListRole;
use crate::orders::manager::command_error_to_app_error;
use crate::payment::CheckoutSession;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", get(list).post(place))
        .route("/api/orders/{id}", get(get_by_id))
        .route("/api/orders/{id}/events", get(events))
        .route("/api/orders/{id}/deliver", post(deliver))
        .route("/api/orders/{id}/accept", post(accept))
        .route("/api/orders/{id}/revision", post(request_revision))
        .route("/api/orders/{id}/cancel", post(cancel))
        .route("/api/orders/{id}/review", post(review))
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub gig_id: i64,
    pub package_type: PackageType,
    #[serde(default)]
    pub requirements: Vec<RequirementAnswer>,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub order: OrderSnapshot,
    /// Absent when no gateway is configured or checkout creation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<CheckoutSession>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// buying | selling
    #[serde(rename = "type")]
    pub role: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DeliverRequest {
    pub message: String,
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// Run one command; a failed command becomes its API error
async fn run(state: &ServerState, cmd: OrderCommand) -> AppResult<Option<String>> {
    let response = state.orders.execute_command(cmd).await;
    match response.error {
        Some(err) => Err(command_error_to_app_error(err)),
        None => Ok(response.order_id),
    }
}

/// Run a user command against an order and return the fresh snapshot
async fn act(
    state: &ServerState,
    user: &CurrentUser,
    payload: OrderCommandPayload,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let order_id = payload_order_id(&payload)?;
    run(state, OrderCommand::new(Actor::user(&user.id), payload)).await?;
    let snapshot = state.orders.get_order(&order_id, &user.id)?;
    Ok(ApiResponse::success(snapshot))
}

fn payload_order_id(payload: &OrderCommandPayload) -> AppResult<String> {
    match payload {
        OrderCommandPayload::DeliverWork { order_id, .. }
        | OrderCommandPayload::AcceptDelivery { order_id }
        | OrderCommandPayload::RequestRevision { order_id, .. }
        | OrderCommandPayload::CancelOrder { order_id, .. }
        | OrderCommandPayload::LeaveReview { order_id, .. } => Ok(order_id.clone()),
        _ => Err(AppError::internal("not a user order action")),
    }
}

/// POST /api/orders - place a pending order and open checkout
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(req): AppJson<PlaceOrderRequest>,
) -> AppResult<ApiResponse<PlaceOrderResponse>> {
    let cmd = OrderCommand::new(
        Actor::user(&user.id),
        OrderCommandPayload::PlaceOrder {
            gig_id: req.gig_id,
            package_type: req.package_type,
            requirements: req.requirements,
        },
    );
    let order_id = run(&state, cmd)
        .await?
        .ok_or_else(|| AppError::internal("order placed without an id"))?;
    let order = state.orders.get_order(&order_id, &user.id)?;

    let checkout = match &state.gateway {
        Some(gateway) => match gateway.create_checkout(&order, &state.config.checkout).await {
            Ok(session) => {
                let attach = OrderCommand::new(
                    Actor::PaymentGateway,
                    OrderCommandPayload::AttachPaymentReference {
                        order_id: order_id.clone(),
                        reference: session.session_id.clone(),
                    },
                );
                if let Err(e) = run(&state, attach).await {
                    tracing::warn!(order_id = %order_id, error = %e, "Failed to record checkout session");
                }
                Some(session)
            }
            Err(e) => {
                tracing::warn!(order_id = %order_id, error = %e, "Checkout creation failed, order stays pending");
                None
            }
        },
        None => None,
    };

    let order = state.orders.get_order(&order_id, &user.id)?;
    Ok(ApiResponse::success_with_message(
        "Order placed",
        PlaceOrderResponse { order, checkout },
    ))
}

/// GET /api/orders?type=&status=&page=&limit=
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<OrderSnapshot>>> {
    let role = OrderListRole::parse(query.role.as_deref());
    let status = match query.status.as_deref().filter(|s| !s.is_empty() && *s != "all") {
        Some(raw) => Some(
            raw.parse::<OrderStatus>()
                .map_err(AppError::validation)?,
        ),
        None => None,
    };
    let (page, limit) = clamp_page(query.page, query.limit, DEFAULT_PAGE_SIZE);
    let orders = state
        .orders
        .list_orders(&user.id, role, status, page, limit)?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    Ok(ApiResponse::success(state.orders.get_order(&id, &user.id)?))
}

/// GET /api/orders/{id}/events
pub async fn events(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<OrderEvent>>> {
    Ok(ApiResponse::success(
        state.orders.get_order_events(&id, &user.id)?,
    ))
}

/// POST /api/orders/{id}/deliver
pub async fn deliver(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<DeliverRequest>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let payload = OrderCommandPayload::DeliverWork {
        order_id: id,
        message: req.message,
        files: req.files,
    };
    act(&state, &user, payload).await
}

/// POST /api/orders/{id}/accept
pub async fn accept(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    act(&state, &user, OrderCommandPayload::AcceptDelivery { order_id: id }).await
}

/// POST /api/orders/{id}/revision
pub async fn request_revision(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<MessageRequest>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let payload = OrderCommandPayload::RequestRevision {
        order_id: id,
        message: req.message,
    };
    act(&state, &user, payload).await
}

/// POST /api/orders/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<CancelRequest>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let payload = OrderCommandPayload::CancelOrder {
        order_id: id,
        reason: req.reason,
    };
    act(&state, &user, payload).await
}

/// POST /api/orders/{id}/review
pub async fn review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<ReviewRequest>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let payload = OrderCommandPayload::LeaveReview {
        order_id: id,
        rating: req.rating,
        comment: req.comment,
    };
    act(&state, &user, payload).await
}

//! Payment gateway webhook and payment reports
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/payments/webhook | POST | gateway signature |
//! | /api/payments/history | GET | user |
//! | /api/payments/earnings | GET | user |
//! | /api/payments/spending | GET | user |
//! | /api/payments/fees | GET | user |
//!
//! The webhook takes the raw body, verified against `Stripe-Signature`.
//! Gateway events become `ConfirmPayment` / `FailPayment` commands keyed by the
//! gateway event id, so redelivery of the same event is a no-op.

use std::str::FromStr;

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, AppResult};
use shared::order::{BuyerSpending, CommandErrorCode, FeeQuote, PaymentRecord, SellerEarnings};
use shared::response::{DEFAULT_PAGE_SIZE, PaginatedResponse, clamp_page};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::manager::command_error_to_app_error;
use crate::orders::money::quote_fees;
use crate::payment::{GatewayEvent, verify_webhook_signature};

/// Fee quotes without a configured gateway
const DEFAULT_CURRENCY: &str = "usd";

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/payments/webhook", post(handle_webhook))
        .route("/api/payments/history", get(history))
        .route("/api/payments/earnings", get(earnings))
        .route("/api/payments/spending", get(spending))
        .route("/api/payments/fees", get(fees))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeesQuery {
    pub amount: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    /// Order the event was applied to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

impl WebhookAck {
    fn ignored() -> ApiResponse<Self> {
        ApiResponse::success(Self {
            received: true,
            order_id: None,
        })
    }
}

/// POST /api/payments/webhook
pub async fn handle_webhook(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<ApiResponse<WebhookAck>> {
    let stripe = state
        .config
        .stripe
        .as_ref()
        .ok_or_else(AppError::payment_unavailable)?;

    let Some(sig_header) = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!("Missing Stripe-Signature header");
        return Err(AppError::webhook_signature_invalid());
    };
    if let Err(e) = verify_webhook_signature(&body, sig_header, &stripe.webhook_secret) {
        tracing::warn!(error = %e, "Webhook signature verification failed");
        return Err(e.into());
    }

    let Some(event) = GatewayEvent::parse(&body)? else {
        return Ok(WebhookAck::ignored());
    };
    tracing::info!(event_id = %event.event_id, event_type = %event.event_type, "Received payment webhook");

    let Some(order_id) = event.resolve_order_id(&state.orders)? else {
        tracing::warn!(event_id = %event.event_id, "Webhook event matches no order");
        return Ok(WebhookAck::ignored());
    };

    let response = state
        .orders
        .execute_command(event.into_command(order_id.clone()))
        .await;
    match response.error {
        None => Ok(ApiResponse::success(WebhookAck {
            received: true,
            order_id: Some(order_id),
        })),
        Some(err) if err.code == CommandErrorCode::OrderNotFound => {
            tracing::warn!(order_id = %order_id, "Webhook references an unknown order");
            Ok(WebhookAck::ignored())
        }
        // Anything else asks the gateway to retry
        Some(err) => Err(command_error_to_app_error(err)),
    }
}

/// GET /api/payments/history?page=&limit=
pub async fn history(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<PaymentRecord>>> {
    let (page, limit) = clamp_page(query.page, query.limit, DEFAULT_PAGE_SIZE);
    let records = state.orders.payment_history(&user.id, page, limit)?;
    Ok(ApiResponse::success(records))
}

/// GET /api/payments/earnings - the caller as seller
pub async fn earnings(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<SellerEarnings>> {
    Ok(ApiResponse::success(state.orders.seller_earnings(&user.id)?))
}

/// GET /api/payments/spending - the caller as buyer
pub async fn spending(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<BuyerSpending>> {
    Ok(ApiResponse::success(state.orders.buyer_spending(&user.id)?))
}

/// GET /api/payments/fees?amount=&currency=
pub async fn fees(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(query): Query<FeesQuery>,
) -> AppResult<ApiResponse<FeeQuote>> {
    let amount = query
        .amount
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| AppError::validation("amount is required"))?;
    let amount = Decimal::from_str(amount)
        .map_err(|_| AppError::validation(format!("amount is not a number: {amount}")))?;

    let currency = query
        .currency
        .filter(|c| !c.trim().is_empty())
        .or_else(|| state.config.stripe.as_ref().map(|s| s.currency.clone()))
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    let quote = quote_fees(amount, currency.trim())
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(ApiResponse::success(quote))
}

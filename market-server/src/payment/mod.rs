//! Payment gateway adapter
//!
//! The order pipeline never talks to the gateway directly. The API layer
//! opens a checkout session after an order is placed and feeds verified
//! webhook events back in as `ConfirmPayment` / `FailPayment` commands.

mod stripe;
pub mod webhook;

pub use stripe::{STRIPE_API_BASE, StripeGateway};
pub use webhook::{GatewayEvent, PaymentOutcome, verify_webhook_signature};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::order::OrderSnapshot;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway rejected the request: {0}")]
    Gateway(String),

    #[error("Webhook signature rejected: {0}")]
    Signature(&'static str),

    #[error("Malformed gateway payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Signature(reason) => {
                AppError::with_message(ErrorCode::WebhookSignatureInvalid, reason)
            }
            PaymentError::Payload(e) => AppError::invalid_request(e.to_string()),
            other => AppError::with_message(ErrorCode::PaymentGatewayError, other.to_string()),
        }
    }
}

/// Redirect targets after checkout
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

/// Hosted checkout session handed back to the buyer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub url: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a checkout session charging the order's total
    async fn create_checkout(
        &self,
        order: &OrderSnapshot,
        urls: &CheckoutUrls,
    ) -> Result<CheckoutSession, PaymentError>;
}
